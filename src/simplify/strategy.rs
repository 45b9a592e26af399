use super::{Simplification, SimplificationType};

/// Policy deciding whether a candidate simplification is applied to the graph
///
pub trait SimplificationStrategy {
    fn should_simplify(&self, candidate: &Simplification) -> bool;
}

/// Accept candidates whose breakend consistency metrics are all within fixed thresholds
///
/// The copy number delta threshold is only applied to patterns which change copy number across
/// the event (duplication and deletion shapes). The event delta threshold applies to every
/// pattern.
///
pub struct DefaultSimplificationStrategy {
    pub max_copy_number_delta: f64,
    pub max_event_delta: f64,
}

impl Default for DefaultSimplificationStrategy {
    fn default() -> Self {
        Self {
            max_copy_number_delta: 0.5,
            max_event_delta: 0.75,
        }
    }
}

impl SimplificationStrategy for DefaultSimplificationStrategy {
    fn should_simplify(&self, candidate: &Simplification) -> bool {
        let check_copy_number = candidate.simplification_type.is_copy_number_changing();
        candidate.consistency.iter().all(|x| {
            !(check_copy_number && x.copy_number_delta().abs() > self.max_copy_number_delta)
                && x.event_delta().abs() <= self.max_event_delta
        })
    }
}

/// Accept every candidate, used to debug pattern detection independent of copy number
///
pub struct AcceptAllStrategy;

impl SimplificationStrategy for AcceptAllStrategy {
    fn should_simplify(&self, _candidate: &Simplification) -> bool {
        true
    }
}

impl SimplificationType {
    pub fn is_copy_number_changing(&self) -> bool {
        matches!(
            self,
            SimplificationType::SimpleDuplication | SimplificationType::SimpleIndel
        )
    }
}
