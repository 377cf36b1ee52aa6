//! Latencia simulada de los stages mock.
//!
//! No es un presupuesto de cómputo real: sólo reproduce el tiempo de espera
//! que observa el cliente. `scale = 0` la desactiva (tests).

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyProfile {
    scale: f64,
}

impl LatencyProfile {
    pub fn new(scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 0.0 };
        Self { scale }
    }

    pub fn none() -> Self {
        Self { scale: 0.0 }
    }

    pub fn scaled(&self, base_ms: u64) -> Duration {
        Duration::from_millis((base_ms as f64 * self.scale).round() as u64)
    }

    /// Bloquea el hilo actual el tiempo escalado.
    pub fn pause(&self, base_ms: u64) {
        let d = self.scaled(base_ms);
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_applies_and_clamps() {
        assert_eq!(LatencyProfile::new(0.5).scaled(3000), Duration::from_millis(1500));
        assert!(LatencyProfile::new(-2.0).scaled(3000).is_zero());
        assert!(LatencyProfile::new(f64::NAN).scaled(3000).is_zero());
        assert!(LatencyProfile::none().scaled(1000).is_zero());
    }
}
