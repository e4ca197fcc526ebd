use tonic::{Request, Response};

pub mod computation_abandon;
pub mod computation_create;
pub mod computation_query;
pub mod enclave_identity;
pub mod key_provision;
pub mod participant_register;
pub mod participants_approve;
pub mod result_fetch;
pub mod run_status;
pub mod upload_begin;
pub mod upload_chunk;
pub mod upload_commit;
pub mod upload_status;

#[async_trait::async_trait]
pub trait Handler<Context>: Send {
    type Error: Send;
    type Response: Send;

    async fn handle(self, ctx: &Context) -> Result<Self::Response, Self::Error>;
}

#[async_trait::async_trait]
impl<T, C> Handler<C> for Request<T>
where
    T: Handler<C>,
    C: Send + Sync,
{
    type Error = T::Error;
    type Response = Response<T::Response>;

    async fn handle(self, ctx: &C) -> Result<Self::Response, Self::Error> {
        let request = self.into_inner();
        let response = request.handle(ctx).await?;
        Ok(Response::new(response))
    }
}
