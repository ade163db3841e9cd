//! Common Types Module
//!
//! Response envelopes shared by the route handlers. The key names are part
//! of the public contract.

use serde::Serialize;

/// `{"respuesta": [record]}`, used by the single-record category and person lookups
#[derive(Debug, Serialize)]
pub struct Respuesta<T> {
    pub respuesta: Vec<T>,
}

impl<T> Respuesta<T> {
    pub fn single(record: T) -> Self {
        Self {
            respuesta: vec![record],
        }
    }
}

/// `{"mensaje": "..."}` confirmation
#[derive(Debug, Serialize)]
pub struct Mensaje {
    pub mensaje: String,
}

impl Mensaje {
    pub fn new(mensaje: &str) -> Self {
        Self {
            mensaje: mensaje.to_string(),
        }
    }
}
