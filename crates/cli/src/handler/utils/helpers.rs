use cinnabar_common::{
    client::{GrpcRegistryClient, Participant},
    registry::state::Role,
};

use crate::{config::Config, error::Error, keys::KeyFile};

pub fn parse_role(s: &str) -> Result<Role, Error> {
    match s {
        "owner" => Ok(Role::Owner),
        "code_provider" => Ok(Role::CodeProvider),
        "data_provider" => Ok(Role::DataProvider),
        "result_consumer" => Ok(Role::ResultConsumer),
        _ => Err(Error::InvalidRole(s.to_string())),
    }
}

/// Builds this participant's client from the local key material and the
/// configured registry endpoint.
pub fn participant(config: &Config) -> Result<Participant<GrpcRegistryClient>, Error> {
    let ctx = KeyFile::load(&config.key_path())?;
    let client = GrpcRegistryClient::new(config.registry_addr.clone(), config.token.clone());
    Ok(Participant::new(client, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_by_snake_case_name() {
        assert_eq!(parse_role("data_provider").unwrap(), Role::DataProvider);
        assert_eq!(parse_role("owner").unwrap(), Role::Owner);
        assert!(parse_role("dataprovider").is_err());
    }
}
