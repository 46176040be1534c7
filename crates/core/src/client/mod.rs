mod create_client;

pub use create_client::CreateClientUseCase;
