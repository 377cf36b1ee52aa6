//! Constantes del núcleo.
//!
//! `TIMESTAMP_FORMAT` forma parte de los nombres de artifacts generados: un
//! cambio aquí altera el formato observable por los clientes.

/// Granularidad de segundo, sin separadores (`20261019101500`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Base usada cuando el nombre deseado queda vacío tras sanitizar.
pub const FALLBACK_BASE_NAME: &str = "artifact";

/// Intentos máximos de `save` en modo `Unique` antes de rendirse.
pub const MAX_NAME_ATTEMPTS: u32 = 64;
