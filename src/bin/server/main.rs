use device_registry::config::Config;
use device_registry::domain::device::service::Service;
use device_registry::inbound::grpc::{GrpcServer, GrpcServerConfig};
use device_registry::outbound::device_repository::{
    DeviceDocument, DocumentDeviceRepository, SERIAL_NUMBER_FIELD,
};
use device_registry::outbound::identity::GrpcTokenVerifier;
use device_registry::outbound::mongo::Mongo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt::init();

    let mongo = Mongo::connect(&config.database_url, &config.database_name).await?;
    let devices = mongo.collection::<DeviceDocument>(&config.device_collection);
    devices.ensure_unique_index(SERIAL_NUMBER_FIELD).await?;

    let device_service = Service::new(DocumentDeviceRepository::new(devices));
    let token_verifier =
        GrpcTokenVerifier::connect_lazy(&config.auth_service_url, config.request_timeout)?;

    let server_config = GrpcServerConfig {
        port: &config.server_port,
        request_timeout: config.request_timeout,
    };

    let grpc_server = GrpcServer::new(device_service, token_verifier, server_config)?;

    grpc_server.run().await
}
