//! Operation settings, loadable from TOML.

use primfit_axis::{AutoAxisOptions, AxisMode};
use serde::{Deserialize, Serialize};

use crate::error::{PrimfitError, Result};

/// Which object axis becomes the primitive's height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisChoice {
    /// Estimate from the mesh.
    #[default]
    Auto,
    /// Object X.
    X,
    /// Object Y.
    Y,
    /// Object Z.
    Z,
}

/// Mesh-to-primitive conversion settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// Height axis selection.
    pub axis: AxisChoice,
    /// With `axis = "auto"`, use the narrowest direction as height.
    pub narrow_axis_as_height: bool,
    /// With `axis = "auto"`, flip the up/down decision.
    pub invert_main_axis: bool,
    /// Fold the inherited object scale into the new primitive's parameters.
    pub apply_scale: bool,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            axis: AxisChoice::Auto,
            narrow_axis_as_height: false,
            invert_main_axis: false,
            apply_scale: true,
        }
    }
}

impl ConvertSettings {
    /// The estimator mode these settings select.
    pub fn axis_mode(&self) -> AxisMode {
        match self.axis {
            AxisChoice::Auto => AxisMode::Auto(AutoAxisOptions {
                narrow_axis_as_height: self.narrow_axis_as_height,
                invert_main_axis: self.invert_main_axis,
            }),
            AxisChoice::X => AxisMode::ForceX,
            AxisChoice::Y => AxisMode::ForceY,
            AxisChoice::Z => AxisMode::ForceZ,
        }
    }
}

/// Scale normalization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeSettings {
    /// Fail instead of approximating when the scale breaks a shape's symmetry.
    pub strict: bool,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// All settings.
///
/// ```toml
/// [convert]
/// axis = "auto"
/// narrow_axis_as_height = false
/// invert_main_axis = false
/// apply_scale = true
///
/// [normalize]
/// strict = true
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Conversion settings.
    pub convert: ConvertSettings,
    /// Normalization settings.
    pub normalize: NormalizeSettings,
}

impl Settings {
    /// Parse and validate settings from a TOML document. Missing keys take
    /// their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(s).map_err(|e| PrimfitError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| PrimfitError::InvalidSettings(e.to_string()))
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        let c = &self.convert;
        if c.axis != AxisChoice::Auto && (c.narrow_axis_as_height || c.invert_main_axis) {
            return Err(PrimfitError::InvalidSettings(
                "narrow_axis_as_height and invert_main_axis require axis = \"auto\"".into(),
            ));
        }
        Ok(())
    }
}
