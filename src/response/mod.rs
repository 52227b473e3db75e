pub mod app_response;
