// App-timer attribution policies
//
// A marker's own timestamp-pair duration is credited to a shader's "app timer"
// only when a policy accepts the (shader, marker) pair. The engine already
// guarantees the marker has a positive own timer and that each pair is
// credited at most once; policies only decide eligibility.

use super::engine::FIXED_FUNCTION_SHADER;
use crate::config::AttributionConfig;
use crate::markers::MarkerInstance;

/// Decides whether a marker's own timer may be credited to a shader
pub trait AppTimerPolicy {
    fn attributes(&self, shader: &str, marker: &MarkerInstance) -> bool;
}

impl<F> AppTimerPolicy for F
where
    F: Fn(&str, &MarkerInstance) -> bool,
{
    fn attributes(&self, shader: &str, marker: &MarkerInstance) -> bool {
        self(shader, marker)
    }
}

/// Naming-convention policy used by the IBL precompute passes
///
/// Accepts when the shader name or the marker label carries one of the
/// configured markers, and the shader is a labelled program (contains
/// `shader_substring`) rather than the fixed-function sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelConventionPolicy {
    shader_markers: Vec<String>,
    label_markers: Vec<String>,
    shader_substring: String,
}

impl LabelConventionPolicy {
    pub fn new(config: &AttributionConfig) -> Self {
        Self {
            shader_markers: config.shader_markers.clone(),
            label_markers: config.label_markers.clone(),
            shader_substring: config.shader_substring.clone(),
        }
    }
}

impl Default for LabelConventionPolicy {
    fn default() -> Self {
        Self::new(&AttributionConfig::default())
    }
}

impl AppTimerPolicy for LabelConventionPolicy {
    fn attributes(&self, shader: &str, marker: &MarkerInstance) -> bool {
        let tagged = self.shader_markers.iter().any(|m| shader.contains(m.as_str()))
            || self
                .label_markers
                .iter()
                .any(|m| marker.label.contains(m.as_str()));

        tagged && shader != FIXED_FUNCTION_SHADER && shader.contains(self.shader_substring.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::MarkerTiming;

    fn region(label: &str) -> MarkerInstance {
        MarkerInstance::new(0, 0, 10, label, MarkerTiming::Measured(100))
    }

    #[test]
    fn test_label_marker_accepts_labelled_shader() {
        let policy = LabelConventionPolicy::default();
        assert!(policy.attributes("shaders/prefilter.frag", &region("IBL: Prefilter")));
    }

    #[test]
    fn test_shader_marker_accepts_any_region() {
        let policy = LabelConventionPolicy::default();
        assert!(policy.attributes("shaders/IBL/brdf.comp", &region("Frame")));
    }

    #[test]
    fn test_untagged_pair_rejected() {
        let policy = LabelConventionPolicy::default();
        assert!(!policy.attributes("shaders/pbr.frag", &region("Opaque Pass")));
    }

    #[test]
    fn test_unlabelled_program_rejected() {
        let policy = LabelConventionPolicy::default();
        assert!(!policy.attributes("17", &region("IBL: Irradiance")));
    }

    #[test]
    fn test_fixed_function_rejected() {
        let policy = LabelConventionPolicy {
            shader_markers: vec![],
            label_markers: vec!["IBL:".to_string()],
            shader_substring: String::new(),
        };
        assert!(!policy.attributes(FIXED_FUNCTION_SHADER, &region("IBL: Clear")));
        assert!(policy.attributes("anything", &region("IBL: Clear")));
    }

    #[test]
    fn test_closure_policy() {
        let policy = |shader: &str, _: &MarkerInstance| shader.ends_with(".comp");
        assert!(policy.attributes("shaders/x.comp", &region("any")));
        assert!(!policy.attributes("shaders/x.frag", &region("any")));
    }
}
