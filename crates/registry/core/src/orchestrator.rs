//! Run orchestration.
//!
//! There is no explicit "start" call: the last provisioned sealed key trips
//! the barrier and the run starts here. Execution happens on a background
//! task so the `Running` phase is observable while the enclave works.
use log::{error, info};

use crate::{
    error::Error,
    launcher::EnclaveLauncher,
    state::{ComputationId, RunId, RunRecord},
    store::Store,
    Registry,
};

pub async fn start_run<R: Registry>(ctx: &R, id: ComputationId) -> Result<(), Error> {
    let launcher = ctx.launcher().await;
    let store = ctx.store().await;

    let run_id = RunId::generate();
    let job = store
        .with_computation(id, |c| c.begin_run(run_id))
        .await
        .map_err(|e| Error::Store(e.to_string()))?
        .ok_or(Error::UnknownComputation(id))??;

    info!("computation {}: starting run {}", id, run_id);
    tokio::spawn(async move {
        let record = match launcher.execute(job).await {
            Ok(outcome) => RunRecord {
                id: run_id,
                exit_code: outcome.exit_code,
                stdout: outcome.stdout,
                stderr: outcome.stderr,
                results: outcome.results,
            },
            // a launcher failure is indistinguishable from a crashed run as
            // far as the lifecycle is concerned
            Err(e) => RunRecord {
                id: run_id,
                exit_code: -1,
                stdout: String::new(),
                stderr: e.to_string(),
                results: Default::default(),
            },
        };
        let exit_code = record.exit_code;

        match store.with_computation(id, |c| c.complete_run(record)).await {
            Ok(Some(Ok(()))) => info!(
                "computation {}: run {} finished with exit code {}",
                id, run_id, exit_code
            ),
            Ok(Some(Err(e))) => {
                error!("computation {}: failed to record run outcome: {}", id, e)
            }
            Ok(None) => error!("computation {}: disappeared while running", id),
            Err(e) => error!(
                "computation {}: store error while recording run outcome: {}",
                id,
                e.to_string()
            ),
        }
    });

    Ok(())
}
