//! Infrastructure layer
//! 외부 시스템(API/파일시스템/클립보드)과 직접 통신하는 구현체 집합.

pub mod adapters;
pub mod config;
pub mod providers;
pub mod render;
