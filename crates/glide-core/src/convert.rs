//! Derived-geometry converters.
//!
//! Display properties such as the thumb diameter or the border corner radius
//! are computed from configuration, never set directly. Every converter is
//! one-directional: asking for the inverse is a programming error and fails
//! with [`ConvertError::Unsupported`].
//!
//! The plain functions cover typed call sites. The [`ValueConverter`] family
//! covers template bindings, where inputs arrive as dynamic [`Value`]s and may
//! be of the wrong kind.

use crate::geometry::Thickness;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while deriving geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// An input or parameter was not a finite number.
    #[error("{converter}: {role} must be a finite number, got {got}")]
    NotNumeric {
        /// Converter that rejected the input
        converter: &'static str,
        /// Which argument was wrong ("value", "parameter", ...)
        role: &'static str,
        /// Debug rendering of the rejected input
        got: String,
    },
    /// Reverse conversion was requested.
    #[error("{converter}: converting back is not supported")]
    Unsupported {
        /// Converter that was asked to convert back
        converter: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

fn finite(converter: &'static str, role: &'static str, v: f64) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ConvertError::NotNumeric {
            converter,
            role,
            got: v.to_string(),
        })
    }
}

// =============================================================================
// Plain functions
// =============================================================================

/// `value * factor`.
pub fn multiply(value: f64, factor: f64) -> Result<f64> {
    Ok(finite("multiply", "value", value)? * finite("multiply", "factor", factor)?)
}

/// Uniform inset of `value * factor` on every edge.
pub fn thickness_from_scalar(value: f64, factor: f64) -> Result<Thickness> {
    const NAME: &str = "thickness_from_scalar";
    let v = finite(NAME, "value", value)? * finite(NAME, "factor", factor)?;
    Ok(Thickness::uniform(v))
}

/// Mean of the four edges, scaled by `factor`.
pub fn average_thickness_to_scalar(thickness: Thickness, factor: f64) -> Result<f64> {
    const NAME: &str = "average_thickness_to_scalar";
    if !thickness.is_finite() {
        return Err(ConvertError::NotNumeric {
            converter: NAME,
            role: "thickness",
            got: format!("{thickness:?}"),
        });
    }
    Ok(thickness.average() * finite(NAME, "factor", factor)?)
}

/// Corner radius as a fixed ratio of the height.
pub fn corner_radius(height: f64, factor: f64) -> Result<f64> {
    const NAME: &str = "corner_radius";
    Ok(finite(NAME, "height", height)? * finite(NAME, "factor", factor)?)
}

/// Radius of an outline drawn inside a rounded shape:
/// `height * factor - border_thickness / 2`.
pub fn border_radius(height: f64, border_thickness: f64, factor: f64) -> Result<f64> {
    const NAME: &str = "border_radius";
    let h = finite(NAME, "height", height)?;
    let b = finite(NAME, "border_thickness", border_thickness)?;
    let f = finite(NAME, "factor", factor)?;
    Ok(h.mul_add(f, -b / 2.0))
}

// =============================================================================
// Binding-side converters
// =============================================================================

/// Dynamically typed value flowing through a template binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A number
    Number(f64),
    /// Per-edge insets
    Thickness(Thickness),
    /// A flag
    Bool(bool),
    /// Free text
    Text(String),
}

impl Value {
    fn number(&self, converter: &'static str, role: &'static str) -> Result<f64> {
        match self {
            Self::Number(n) => finite(converter, role, *n),
            other => Err(ConvertError::NotNumeric {
                converter,
                role,
                got: format!("{other:?}"),
            }),
        }
    }

    fn thickness(&self, converter: &'static str, role: &'static str) -> Result<Thickness> {
        match self {
            Self::Thickness(t) if t.is_finite() => Ok(*t),
            other => Err(ConvertError::NotNumeric {
                converter,
                role,
                got: format!("{other:?}"),
            }),
        }
    }

    /// Read as a number, if it is one.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Read as a thickness, if it is one.
    #[must_use]
    pub const fn as_thickness(&self) -> Option<Thickness> {
        match self {
            Self::Thickness(t) => Some(*t),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Thickness> for Value {
    fn from(t: Thickness) -> Self {
        Self::Thickness(t)
    }
}

/// One-way converter used by template bindings.
pub trait ValueConverter {
    /// Name used in error messages.
    fn name(&self) -> &'static str;

    /// Derive the display value from a source value and parameter.
    fn convert(&self, value: &Value, parameter: &Value) -> Result<Value>;

    /// Always fails: derived properties are never written back.
    fn convert_back(&self, _value: &Value, _parameter: &Value) -> Result<Value> {
        Err(ConvertError::Unsupported {
            converter: self.name(),
        })
    }
}

/// [`multiply`] as a binding converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiply;

impl ValueConverter for Multiply {
    fn name(&self) -> &'static str {
        "multiply"
    }

    fn convert(&self, value: &Value, parameter: &Value) -> Result<Value> {
        let v = value.number(self.name(), "value")?;
        let p = parameter.number(self.name(), "parameter")?;
        multiply(v, p).map(Value::Number)
    }
}

/// [`thickness_from_scalar`] as a binding converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThicknessFromScalar;

impl ValueConverter for ThicknessFromScalar {
    fn name(&self) -> &'static str {
        "thickness_from_scalar"
    }

    fn convert(&self, value: &Value, parameter: &Value) -> Result<Value> {
        let v = value.number(self.name(), "value")?;
        let p = parameter.number(self.name(), "parameter")?;
        thickness_from_scalar(v, p).map(Value::Thickness)
    }
}

/// [`average_thickness_to_scalar`] as a binding converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageThickness;

impl ValueConverter for AverageThickness {
    fn name(&self) -> &'static str {
        "average_thickness_to_scalar"
    }

    fn convert(&self, value: &Value, parameter: &Value) -> Result<Value> {
        let t = value.thickness(self.name(), "value")?;
        let p = parameter.number(self.name(), "parameter")?;
        average_thickness_to_scalar(t, p).map(Value::Number)
    }
}

/// [`corner_radius`] as a binding converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CornerRadiusOf;

impl ValueConverter for CornerRadiusOf {
    fn name(&self) -> &'static str {
        "corner_radius"
    }

    fn convert(&self, value: &Value, parameter: &Value) -> Result<Value> {
        let h = value.number(self.name(), "value")?;
        let p = parameter.number(self.name(), "parameter")?;
        corner_radius(h, p).map(Value::Number)
    }
}

/// Names a single-source converter so bindings can be declared as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conversion {
    /// [`Multiply`]
    Multiply,
    /// [`ThicknessFromScalar`]
    ThicknessFromScalar,
    /// [`AverageThickness`]
    AverageThickness,
    /// [`CornerRadiusOf`]
    CornerRadius,
}

impl Conversion {
    /// The converter this names.
    #[must_use]
    pub fn converter(self) -> &'static dyn ValueConverter {
        match self {
            Self::Multiply => &Multiply,
            Self::ThicknessFromScalar => &ThicknessFromScalar,
            Self::AverageThickness => &AverageThickness,
            Self::CornerRadius => &CornerRadiusOf,
        }
    }
}

/// [`border_radius`] over two bound sources: the height and the border
/// thickness (a [`Value::Thickness`], averaged, or a plain number).
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderRadius;

impl BorderRadius {
    /// Name used in error messages.
    pub const NAME: &'static str = "border_radius";

    /// Derive the outline radius.
    pub fn convert(&self, height: &Value, border: &Value, parameter: &Value) -> Result<Value> {
        let h = height.number(Self::NAME, "height")?;
        let b = match border {
            Value::Thickness(_) => border.thickness(Self::NAME, "border_thickness")?.average(),
            other => other.number(Self::NAME, "border_thickness")?,
        };
        let f = parameter.number(Self::NAME, "parameter")?;
        border_radius(h, b, f).map(Value::Number)
    }

    /// Always fails: derived properties are never written back.
    pub fn convert_back(&self, _value: &Value) -> Result<Vec<Value>> {
        Err(ConvertError::Unsupported {
            converter: Self::NAME,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // Plain function tests
    // =========================================================================

    #[test]
    fn test_multiply() {
        assert_eq!(multiply(20.0, 0.75), Ok(15.0));
        assert_eq!(multiply(0.0, 0.375), Ok(0.0));
    }

    #[test]
    fn test_multiply_rejects_non_finite() {
        let err = multiply(f64::NAN, 2.0).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::NotNumeric { role: "value", .. }
        ));
        assert!(multiply(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_thickness_from_scalar() {
        assert_eq!(thickness_from_scalar(20.0, 0.125), Ok(Thickness::uniform(2.5)));
    }

    #[test]
    fn test_average_thickness_to_scalar() {
        let t = Thickness::new(1.0, 2.0, 3.0, 2.0);
        assert_eq!(average_thickness_to_scalar(t, 2.0), Ok(4.0));
        let bad = Thickness::new(f64::NAN, 0.0, 0.0, 0.0);
        assert!(average_thickness_to_scalar(bad, 1.0).is_err());
    }

    #[test]
    fn test_border_radius() {
        assert_eq!(border_radius(20.0, 1.0, 0.5), Ok(9.5));
        assert_eq!(border_radius(0.0, 0.0, 0.5), Ok(0.0));
    }

    #[test]
    fn test_zero_height_yields_zero() {
        assert_eq!(multiply(0.0, 0.75), Ok(0.0));
        assert_eq!(corner_radius(0.0, 0.375), Ok(0.0));
        assert_eq!(thickness_from_scalar(0.0, 0.125), Ok(Thickness::ZERO));
    }

    // =========================================================================
    // Binding converter tests
    // =========================================================================

    #[test]
    fn test_multiply_converter() {
        let out = Multiply.convert(&20.0.into(), &0.5.into()).unwrap();
        assert_eq!(out, Value::Number(10.0));
    }

    #[test]
    fn test_converter_rejects_wrong_kind() {
        let err = Multiply
            .convert(&Value::Text("wide".into()), &0.5.into())
            .unwrap_err();
        assert!(err.to_string().contains("multiply: value must be a finite number"));

        let err = ThicknessFromScalar
            .convert(&1.0.into(), &Value::Bool(true))
            .unwrap_err();
        assert!(matches!(err, ConvertError::NotNumeric { role: "parameter", .. }));
    }

    #[test]
    fn test_average_thickness_converter_requires_thickness() {
        assert!(AverageThickness.convert(&1.0.into(), &1.0.into()).is_err());
        let out = AverageThickness
            .convert(&Thickness::uniform(2.0).into(), &1.0.into())
            .unwrap();
        assert_eq!(out.as_number(), Some(2.0));
    }

    #[test]
    fn test_border_radius_converter_accepts_thickness_or_number() {
        let h = Value::Number(20.0);
        let f = Value::Number(0.5);
        let from_thickness = BorderRadius
            .convert(&h, &Thickness::uniform(1.0).into(), &f)
            .unwrap();
        let from_number = BorderRadius.convert(&h, &1.0.into(), &f).unwrap();
        assert_eq!(from_thickness, Value::Number(9.5));
        assert_eq!(from_thickness, from_number);
    }

    #[test]
    fn test_convert_back_unsupported() {
        let converters: [&dyn ValueConverter; 4] =
            [&Multiply, &ThicknessFromScalar, &AverageThickness, &CornerRadiusOf];
        for c in converters {
            let err = c.convert_back(&1.0.into(), &1.0.into()).unwrap_err();
            assert_eq!(err, ConvertError::Unsupported { converter: c.name() });
        }
        assert!(BorderRadius.convert_back(&1.0.into()).is_err());
    }

    #[test]
    fn test_conversion_names_converter() {
        assert_eq!(Conversion::Multiply.converter().name(), "multiply");
        assert_eq!(Conversion::CornerRadius.converter().name(), "corner_radius");
        let out = Conversion::ThicknessFromScalar
            .converter()
            .convert(&20.0.into(), &0.125.into())
            .unwrap();
        assert_eq!(out, Value::Thickness(Thickness::uniform(2.5)));
    }

    proptest! {
        #[test]
        fn prop_converters_are_deterministic(v in -1e6f64..1e6, f in -10.0f64..10.0) {
            prop_assert_eq!(multiply(v, f).unwrap().to_bits(), multiply(v, f).unwrap().to_bits());
            prop_assert_eq!(thickness_from_scalar(v, f), thickness_from_scalar(v, f));
        }

        #[test]
        fn prop_ratios_never_divide_by_height(f in 0.0f64..1.0) {
            prop_assert_eq!(multiply(0.0, f), Ok(0.0));
            prop_assert_eq!(corner_radius(0.0, f), Ok(0.0));
        }
    }
}
