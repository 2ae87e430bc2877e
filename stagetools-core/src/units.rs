/// Linear unit scales, display conversion, and formatting
use crate::error::Error;

/// A named linear unit paired with its meters-per-unit factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    pub name: &'static str,
    pub meters_per_unit: f64,
}

/// Canonical factors a stage's meters-per-unit is matched against.
pub const CANONICAL_UNITS: [UnitScale; 6] = [
    UnitScale { name: "m", meters_per_unit: 1.0 },
    UnitScale { name: "dm", meters_per_unit: 0.1 },
    UnitScale { name: "cm", meters_per_unit: 0.01 },
    UnitScale { name: "mm", meters_per_unit: 0.001 },
    UnitScale { name: "inch", meters_per_unit: 0.0254 },
    UnitScale { name: "ft", meters_per_unit: 0.3048 },
];

/// Units offered for display. Presentation only; the stage is never rescaled.
pub const DISPLAY_UNITS: [UnitScale; 5] = [
    UnitScale { name: "mm", meters_per_unit: 0.001 },
    UnitScale { name: "cm", meters_per_unit: 0.01 },
    UnitScale { name: "m", meters_per_unit: 1.0 },
    UnitScale { name: "inch", meters_per_unit: 0.0254 },
    UnitScale { name: "ft", meters_per_unit: 0.3048 },
];

/// Look up a display unit by name.
pub fn display_unit(name: &str) -> Option<UnitScale> {
    DISPLAY_UNITS.iter().copied().find(|u| u.name == name)
}

/// Decimal places appropriate for a display unit.
pub fn precision_for(unit_name: &str) -> usize {
    match unit_name {
        "mm" => 1,
        "cm" => 2,
        "m" => 4,
        "inch" => 2,
        "ft" => 3,
        _ => 3,
    }
}

/// Label a stage's meters-per-unit factor.
///
/// Exact canonical factors get their abbreviation; anything else is shown
/// as a meters value rounded up to two decimals.
pub fn stage_unit_label(meters_per_unit: f64) -> String {
    for unit in CANONICAL_UNITS {
        if unit.meters_per_unit == meters_per_unit {
            return unit.name.to_string();
        }
    }
    let v = (meters_per_unit * 100.0).ceil() / 100.0;
    format!("{:.2} m", v)
}

fn check_mpu(meters_per_unit: f64) -> Result<(), Error> {
    if !(meters_per_unit > 0.0) || !meters_per_unit.is_finite() {
        return Err(Error::InvalidUnitConfiguration { meters_per_unit });
    }
    Ok(())
}

/// Convert a native-unit length into a display unit.
///
/// `value_m = native_value * native_mpu; displayed = value_m / display_mpu`.
/// Non-positive or non-finite factors are rejected rather than producing
/// an infinite or NaN result.
pub fn to_display(native_value: f64, native_mpu: f64, display_mpu: f64) -> Result<f64, Error> {
    check_mpu(native_mpu)?;
    check_mpu(display_mpu)?;
    Ok(native_value * native_mpu / display_mpu)
}

/// Convert and format a native-unit length as `"<value> <unit>"` with the
/// unit's display precision.
pub fn format_length(native_value: f64, native_mpu: f64, unit: UnitScale) -> Result<String, Error> {
    let displayed = to_display(native_value, native_mpu, unit.meters_per_unit)?;
    let precision = precision_for(unit.name);
    Ok(format!("{:.*} {}", precision, displayed, unit.name))
}
