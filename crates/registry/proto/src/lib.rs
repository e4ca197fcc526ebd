pub mod registry {
    tonic::include_proto!("cinnabar.registry");
}
