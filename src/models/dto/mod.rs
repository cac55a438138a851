pub mod question_dto;
pub mod request;
pub mod response;
