//! Window synthesis
//!
//! [`Window`] names a concrete family; [`WindowSpec`] is what callers hand
//! in (a name, a `(name, parameter)` pair, a bare Kaiser beta, or explicit
//! coefficients) and resolves to a coefficient vector of the requested length.
//!
//! `periodic` selects the denominator of the cosine/Bessel argument: `n` for
//! FFT-ready periodic windows, `n - 1` for symmetric windows.

use crate::error::{AnalysisError, Result};
use crate::math::bessel_i0;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    /// Hann window (raised cosine)
    Hann,
    /// Hamming window
    Hamming,
    /// Kaiser window with shape parameter beta
    Kaiser {
        /// Shape parameter; 0 gives a rectangular window.
        beta: f64,
    },
}

impl Window {
    /// Look up a window family by name (case-insensitive).
    ///
    /// Kaiser needs a shape parameter and is only reachable through
    /// [`Window::with_param`] or a bare beta.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hann" => Ok(Window::Hann),
            "hamming" => Ok(Window::Hamming),
            "kaiser" => Err(AnalysisError::UnsupportedWindow(
                "kaiser requires a shape parameter".to_string(),
            )),
            other => Err(AnalysisError::UnsupportedWindow(other.to_string())),
        }
    }

    /// Look up a parameterized window family by name (case-insensitive).
    pub fn with_param(name: &str, param: f64) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "kaiser" => Self::kaiser(param),
            other => Err(AnalysisError::UnsupportedWindow(format!(
                "{other} does not take a parameter"
            ))),
        }
    }

    /// Kaiser window with a finite beta.
    pub fn kaiser(beta: f64) -> Result<Self> {
        if !beta.is_finite() {
            return Err(AnalysisError::invalid(format!(
                "kaiser beta must be finite, got {beta}"
            )));
        }
        Ok(Window::Kaiser { beta })
    }

    /// Lowercase family name.
    pub fn name(&self) -> &'static str {
        match self {
            Window::Hann => "hann",
            Window::Hamming => "hamming",
            Window::Kaiser { .. } => "kaiser",
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize, periodic: bool) -> Vec<f64> {
        if size <= 1 {
            return vec![1.0; size];
        }
        let denom = (if periodic { size } else { size - 1 }) as f64;

        match *self {
            Window::Hann => (0..size)
                .map(|n| 0.5 * (1.0 - (2.0 * PI * n as f64 / denom).cos()))
                .collect(),
            Window::Hamming => (0..size)
                .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / denom).cos())
                .collect(),
            Window::Kaiser { beta } => {
                let norm = bessel_i0(beta);
                (0..size)
                    .map(|n| {
                        // Clamp keeps the root real at the boundary samples
                        let t = (2.0 * n as f64 / denom - 1.0).clamp(-1.0, 1.0);
                        bessel_i0(beta * (1.0 - t * t).sqrt()) / norm
                    })
                    .collect()
            }
        }
    }

    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f64], periodic: bool) {
        let coeffs = self.coefficients(buffer.len(), periodic);
        for (sample, w) in buffer.iter_mut().zip(coeffs) {
            *sample *= w;
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Kaiser { beta } => write!(f, "kaiser({beta})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Caller-facing window specification.
///
/// Deserializes from a string (`"hann"`), a number (Kaiser beta), a
/// `[name, parameter]` pair (`["kaiser", 14.0]`), or an array of coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindowSpec {
    /// Named window without parameters.
    Named(String),
    /// Bare number, read as a Kaiser beta.
    Beta(f64),
    /// Named window with one shape parameter.
    Parameterized(String, f64),
    /// Explicit coefficients; must match the requested length exactly.
    Coefficients(Vec<f64>),
}

impl WindowSpec {
    /// Resolve to a concrete window family, if the spec names one.
    ///
    /// Explicit coefficient vectors return `Ok(None)`.
    pub fn window(&self) -> Result<Option<Window>> {
        match self {
            WindowSpec::Named(name) => Window::from_name(name).map(Some),
            WindowSpec::Beta(beta) => Window::kaiser(*beta).map(Some),
            WindowSpec::Parameterized(name, param) => Window::with_param(name, *param).map(Some),
            WindowSpec::Coefficients(_) => Ok(None),
        }
    }

    /// Family name used by bandwidth lookups; `None` for explicit coefficients.
    pub fn family_name(&self) -> Option<String> {
        match self {
            WindowSpec::Named(name) | WindowSpec::Parameterized(name, _) => {
                Some(name.to_ascii_lowercase())
            }
            WindowSpec::Beta(_) => Some("kaiser".to_string()),
            WindowSpec::Coefficients(_) => None,
        }
    }

    /// Produce exactly `length` coefficients.
    ///
    /// # Example
    /// ```rust
    /// use resona_analysis::WindowSpec;
    ///
    /// let w = WindowSpec::from("hann").resolve(8, true).unwrap();
    /// assert_eq!(w.len(), 8);
    /// assert_eq!(w[0], 0.0);
    /// ```
    pub fn resolve(&self, length: usize, periodic: bool) -> Result<Vec<f64>> {
        if let WindowSpec::Coefficients(coeffs) = self {
            if coeffs.len() != length {
                return Err(AnalysisError::SizeMismatch {
                    expected: length,
                    actual: coeffs.len(),
                });
            }
            return Ok(coeffs.clone());
        }
        let window = self
            .window()?
            .ok_or_else(|| AnalysisError::invalid("window spec has no family"))?;
        Ok(window.coefficients(length, periodic))
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        WindowSpec::Named("hann".to_string())
    }
}

impl From<&str> for WindowSpec {
    fn from(name: &str) -> Self {
        WindowSpec::Named(name.to_string())
    }
}

impl From<Window> for WindowSpec {
    fn from(window: Window) -> Self {
        match window {
            Window::Kaiser { beta } => WindowSpec::Parameterized("kaiser".to_string(), beta),
            other => WindowSpec::Named(other.name().to_string()),
        }
    }
}

impl From<Vec<f64>> for WindowSpec {
    fn from(coeffs: Vec<f64>) -> Self {
        WindowSpec::Coefficients(coeffs)
    }
}
