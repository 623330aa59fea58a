//! Named enums used across config slices
//!
//! Every enum is stored and addressed by its canonical name. The first variant
//! of each enum is its default, which is also what unparseable names fall
//! back to.

use serde::{Deserialize, Serialize};

/// Enum addressable by canonical name
pub trait NamedEnum: Copy + Default + PartialEq + 'static {
    /// All variants, default first
    const ALL: &'static [Self];

    /// Extra accepted spellings (matched case-insensitively)
    const ALIASES: &'static [(&'static str, Self)] = &[];

    fn name(self) -> &'static str;

    /// Case-insensitive match against names then aliases
    fn try_from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .or_else(|| {
                Self::ALIASES
                    .iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(s))
                    .map(|(_, v)| *v)
            })
    }

    /// Like `try_from_name`, falling back to the default
    fn from_name(s: &str) -> Self {
        Self::try_from_name(s).unwrap_or_default()
    }
}

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $default:ident => $default_str:literal,
            $($variant:ident => $variant_str:literal),* $(,)?
        }
        $(aliases { $($alias:literal => $target:ident),* $(,)? })?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        $vis enum $name {
            #[default]
            #[serde(rename = $default_str)]
            $default,
            $(
                #[serde(rename = $variant_str)]
                $variant,
            )*
        }

        impl $name {
            pub const NAMES: &'static [&'static str] = &[$default_str, $($variant_str),*];
        }

        impl NamedEnum for $name {
            const ALL: &'static [Self] = &[$name::$default, $($name::$variant),*];
            const ALIASES: &'static [(&'static str, Self)] = &[$($(($alias, $name::$target)),*)?];

            fn name(self) -> &'static str {
                match self {
                    $name::$default => $default_str,
                    $($name::$variant => $variant_str,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_enum! {
    /// Discriminator for the active shape variant
    pub enum ShapeType {
        Sphere => "sphere",
        Ring => "ring",
        Prism => "prism",
        Cylinder => "cylinder",
        Polyhedron => "polyhedron",
        Torus => "torus",
        Capsule => "capsule",
        Cone => "cone",
        Jet => "jet",
        Rays => "rays",
        Kamehameha => "kamehameha",
        Molecule => "molecule",
    }
    aliases { "cube" => Polyhedron, "beam" => Kamehameha, "tube" => Cylinder }
}

named_enum! {
    pub enum SphereAlgorithm {
        LatLon => "LAT_LON",
        TypeA => "TYPE_A",
        TypeE => "TYPE_E",
    }
    aliases { "UV" => LatLon }
}

named_enum! {
    pub enum PolyType {
        Cube => "CUBE",
        Tetrahedron => "TETRAHEDRON",
        Octahedron => "OCTAHEDRON",
        Dodecahedron => "DODECAHEDRON",
        Icosahedron => "ICOSAHEDRON",
    }
    aliases { "TETRA" => Tetrahedron, "OCTA" => Octahedron, "DODECA" => Dodecahedron, "ICOSA" => Icosahedron }
}

named_enum! {
    pub enum RayArrangement {
        Radial => "RADIAL",
        Spherical => "SPHERICAL",
        Parallel => "PARALLEL",
        Converging => "CONVERGING",
        Diverging => "DIVERGING",
    }
}

named_enum! {
    pub enum FillMode {
        Solid => "SOLID",
        Wire => "WIRE",
        Cage => "CAGE",
        Points => "POINTS",
    }
    aliases { "WIREFRAME" => Wire, "LINES" => Wire, "FILLED" => Solid }
}

named_enum! {
    pub enum MaskType {
        Full => "FULL",
        Bands => "BANDS",
        Stripes => "STRIPES",
        Checker => "CHECKER",
        Radial => "RADIAL",
        Gradient => "GRADIENT",
    }
}

named_enum! {
    pub enum QuadPattern {
        Filled => "FILLED",
        Triangle => "TRIANGLE",
        Wave => "WAVE",
        Tooth => "TOOTH",
        Parallelogram => "PARALLELOGRAM",
        Stripe => "STRIPE",
    }
}

named_enum! {
    pub enum ColorMode {
        Solid => "SOLID",
        Gradient => "GRADIENT",
        Cycling => "CYCLING",
        MeshGradient => "MESH_GRADIENT",
        Random => "RANDOM",
    }
}

named_enum! {
    pub enum BlendMode {
        Normal => "NORMAL",
        Add => "ADD",
        Multiply => "MULTIPLY",
        Screen => "SCREEN",
    }
    aliases { "ADDITIVE" => Add }
}

named_enum! {
    pub enum Anchor {
        Center => "CENTER",
        Feet => "FEET",
        Head => "HEAD",
        Above => "ABOVE",
        Below => "BELOW",
    }
}

named_enum! {
    pub enum Facing {
        Fixed => "FIXED",
        PlayerLook => "PLAYER_LOOK",
        Velocity => "VELOCITY",
        Camera => "CAMERA",
    }
}

named_enum! {
    pub enum Billboard {
        None => "NONE",
        Full => "FULL",
        YAxis => "Y_AXIS",
    }
}

named_enum! {
    pub enum Axis {
        Y => "Y",
        X => "X",
        Z => "Z",
    }
}

named_enum! {
    pub enum Waveform {
        Sine => "SINE",
        Square => "SQUARE",
        Triangle => "TRIANGLE",
        Sawtooth => "SAWTOOTH",
    }
    aliases { "SIN" => Sine, "SAW" => Sawtooth }
}

named_enum! {
    /// Energy travel along rays; NONE disables the effect
    pub enum TravelMode {
        None => "NONE",
        Chase => "CHASE",
        Scroll => "SCROLL",
        Comet => "COMET",
        Spark => "SPARK",
        PulseWave => "PULSE_WAVE",
        ReverseChase => "REVERSE_CHASE",
    }
    aliases { "OFF" => None }
}

named_enum! {
    /// Ray brightness flicker; NONE disables the effect
    pub enum FlickerMode {
        None => "NONE",
        Scintillation => "SCINTILLATION",
        Strobe => "STROBE",
        FadePulse => "FADE_PULSE",
        Heartbeat => "HEARTBEAT",
        Lightning => "LIGHTNING",
    }
    aliases { "OFF" => None }
}

named_enum! {
    pub enum ShockwaveShape {
        Ring => "RING",
        Sphere => "SPHERE",
        Cylinder => "CYLINDER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first_variant() {
        assert_eq!(FillMode::default(), FillMode::Solid);
        assert_eq!(TravelMode::default(), TravelMode::None);
        assert_eq!(ShapeType::default(), ShapeType::Sphere);
        assert_eq!(FillMode::ALL[0], FillMode::default());
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(FillMode::from_name("wire"), FillMode::Wire);
        assert_eq!(ShapeType::from_name("TORUS"), ShapeType::Torus);
        assert_eq!(TravelMode::from_name(" pulse_wave "), TravelMode::PulseWave);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(FillMode::from_name("wireframe"), FillMode::Wire);
        assert_eq!(TravelMode::from_name("off"), TravelMode::None);
        assert_eq!(ShapeType::try_from_name("cube"), Some(ShapeType::Polyhedron));
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(ShapeType::try_from_name("dodecagon"), None);
        assert_eq!(BlendMode::from_name("dodecagon"), BlendMode::Normal);
    }

    #[test]
    fn test_names_match_serde() {
        for mode in FlickerMode::ALL {
            let json = serde_json::to_value(mode).unwrap();
            assert_eq!(json, serde_json::Value::String(mode.name().to_string()));
        }
        assert_eq!(FlickerMode::NAMES.len(), FlickerMode::ALL.len());
    }
}
