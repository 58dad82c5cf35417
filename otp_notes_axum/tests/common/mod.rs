pub mod api_client;
pub mod stub_verifier;
pub mod test_server;

pub use api_client::ApiClient;
pub use test_server::TestServer;
