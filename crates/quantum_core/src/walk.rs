//! Digit-angle walks.
//!
//! Each decimal digit pushes a cursor a fixed distance in a direction chosen
//! by the digit; the heading is restored after every push. A random digit
//! sequence gives a drunkard's walk. Only the geometry is computed here;
//! drawing is left to whoever consumes the points.

use std::fmt;
use std::str::FromStr;

use crate::error::QuantumError;

/// Colour name per digit, cool to hot.
pub const HEATMAP: [&str; 10] = [
    "gray", "black", "blue", "purple", "cyan", "green", "yellow", "orange", "brown", "red",
];

/// How a digit becomes a direction, in degrees counter-clockwise from east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkMode {
    /// `digit * 36`: the ten digits spread around the full circle.
    #[default]
    Circle,
    /// `(digit - 5) * 15`: an eastward drift resembling a time series.
    East,
}

impl WalkMode {
    /// Heading for `digit` in degrees.
    pub fn angle_degrees(&self, digit: u8) -> f64 {
        let d = f64::from(digit);
        match self {
            WalkMode::Circle => d * 36.0,
            WalkMode::East => (d - 5.0) * 15.0,
        }
    }
}

impl FromStr for WalkMode {
    type Err = QuantumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "circle" => Ok(WalkMode::Circle),
            "east" => Ok(WalkMode::East),
            _ => Err(QuantumError::InvalidArgument(format!(
                "unknown walk mode '{}': expected circle or east",
                s
            ))),
        }
    }
}

impl fmt::Display for WalkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkMode::Circle => write!(f, "circle"),
            WalkMode::East => write!(f, "east"),
        }
    }
}

/// One segment of a walk, ending at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkStep {
    /// Digit that produced the segment.
    pub digit: u8,
    /// End point, x coordinate.
    pub x: f64,
    /// End point, y coordinate.
    pub y: f64,
    /// Heat-map colour for the digit.
    pub colour: &'static str,
}

/// Cursor that turns digits into walk steps, starting at the origin.
///
/// # Examples
///
/// ```rust
/// use quantum_core::walk::{DigitWalk, WalkMode};
///
/// let mut walk = DigitWalk::new(WalkMode::Circle, 5.0);
/// let step = walk.push(0).unwrap();
/// assert_eq!((step.x, step.y), (5.0, 0.0));
/// assert_eq!(step.colour, "gray");
/// ```
#[derive(Debug, Clone)]
pub struct DigitWalk {
    mode: WalkMode,
    step: f64,
    x: f64,
    y: f64,
}

impl DigitWalk {
    /// Walk with the given mode and step length.
    pub fn new(mode: WalkMode, step: f64) -> Self {
        Self {
            mode,
            step,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Current position.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Advance by one digit.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `digit > 9`.
    pub fn push(&mut self, digit: u8) -> Result<WalkStep, QuantumError> {
        let colour = HEATMAP.get(usize::from(digit)).copied().ok_or_else(|| {
            QuantumError::InvalidArgument(format!("{} is not a decimal digit", digit))
        })?;
        let radians = self.mode.angle_degrees(digit).to_radians();
        self.x += self.step * radians.cos();
        self.y += self.step * radians.sin();
        Ok(WalkStep {
            digit,
            x: self.x,
            y: self.y,
            colour,
        })
    }

    /// Advance through every digit in `digits`.
    pub fn extend<I>(&mut self, digits: I) -> Result<Vec<WalkStep>, QuantumError>
    where
        I: IntoIterator<Item = u8>,
    {
        digits.into_iter().map(|d| self.push(d)).collect()
    }
}

/// Decimal digits appearing in `text`, in order; everything else is skipped.
///
/// # Examples
///
/// ```
/// use quantum_core::walk::digits_from_text;
///
/// assert_eq!(digits_from_text("3.14 15\n92"), vec![3, 1, 4, 1, 5, 9, 2]);
/// ```
pub fn digits_from_text(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .collect()
}
