//! Servicios colaboradores del core

pub mod storage_service;
