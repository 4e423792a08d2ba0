//! 애플리케이션 유스케이스 모음.

pub mod copy_review;
pub mod generate_review;
pub mod inspect_config;
