pub mod api_response;
pub mod auth_status;
pub mod model_endpoint_config;
pub mod wizard_state;
