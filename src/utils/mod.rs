pub mod api_response;
pub mod auth_extractor;
pub mod jwt_utils;
pub mod validated_wrapper;
pub mod validator_utils;
