//! Parsing steps and the stepper state machine.
//!
//! A stat line is consumed category by category. Each [`ParsingStep`]
//! names one category of matchers; the [`Stepper`] decides which step
//! comes next depending on whether the current step matched anything.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A matcher category, in the order the stepper tries them.
///
/// # Examples
///
/// ```rust
/// use statline::ParsingStep;
///
/// assert_eq!(ParsingStep::Special.value(), 0);
/// assert!(ParsingStep::Form.value() < ParsingStep::GeneralStat.value());
///
/// // Damage and pool stats compete with general stats in one step
/// assert_eq!(ParsingStep::PoolStat.priority_group(), ParsingStep::GeneralStat);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParsingStep {
    /// Whole-line special cases.
    Special,

    /// Prefixes that retarget stats, e.g. "nearby enemies have".
    StatManipulation,

    /// Value multipliers, e.g. "per 10 strength".
    ValueConversion,

    /// Phrases that fix form and stat together.
    FormAndStat,

    /// Keystone-like phrases that fix form and stat together.
    Keystone,

    /// Forms, e.g. "#% increased".
    Form,

    GeneralStat,

    DamageStat,

    PoolStat,

    Condition,

    /// Trigger conditions, e.g. "on kill".
    ActionCondition,
}

impl ParsingStep {
    pub const ALL: [ParsingStep; 11] = [
        ParsingStep::Special,
        ParsingStep::StatManipulation,
        ParsingStep::ValueConversion,
        ParsingStep::FormAndStat,
        ParsingStep::Keystone,
        ParsingStep::Form,
        ParsingStep::GeneralStat,
        ParsingStep::DamageStat,
        ParsingStep::PoolStat,
        ParsingStep::Condition,
        ParsingStep::ActionCondition,
    ];

    /// Numeric position of this step for ordering.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Whether the step's matchers produce stats.
    pub fn is_stat(self) -> bool {
        matches!(
            self,
            ParsingStep::GeneralStat | ParsingStep::DamageStat | ParsingStep::PoolStat
        )
    }

    /// The step whose collections are tried together with this one.
    ///
    /// All stat categories share the [`ParsingStep::GeneralStat`] group;
    /// every other step is its own group.
    pub fn priority_group(self) -> ParsingStep {
        if self.is_stat() {
            ParsingStep::GeneralStat
        } else {
            self
        }
    }
}

impl fmt::Display for ParsingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParsingStep::Special => "Special",
            ParsingStep::StatManipulation => "StatManipulation",
            ParsingStep::ValueConversion => "ValueConversion",
            ParsingStep::FormAndStat => "FormAndStat",
            ParsingStep::Keystone => "Keystone",
            ParsingStep::Form => "Form",
            ParsingStep::GeneralStat => "GeneralStat",
            ParsingStep::DamageStat => "DamageStat",
            ParsingStep::PoolStat => "PoolStat",
            ParsingStep::Condition => "Condition",
            ParsingStep::ActionCondition => "ActionCondition",
        };
        f.write_str(name)
    }
}

/// Where the stepper currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperState {
    At(ParsingStep),
    /// All steps ran; the line succeeds if no text is left.
    Done,
    /// A step that must match found nothing.
    Failed(ParsingStep),
}

/// The transition table between parsing steps.
///
/// | step | matched | not matched | repeats |
/// |---|---|---|---|
/// | Special | Done | StatManipulation | no |
/// | StatManipulation | ValueConversion | ValueConversion | yes |
/// | ValueConversion | FormAndStat | FormAndStat | yes |
/// | FormAndStat | Condition | Keystone | no |
/// | Keystone | Condition | Form | no |
/// | Form | GeneralStat | Failed | no |
/// | GeneralStat (with Damage/Pool) | Condition | Failed | no |
/// | Condition | ActionCondition | ActionCondition | yes |
/// | ActionCondition | Done | Done | yes |
///
/// # Examples
///
/// ```rust
/// use statline::{ParsingStep, Stepper, StepperState};
///
/// let stepper = Stepper::new();
/// assert_eq!(stepper.initial(), StepperState::At(ParsingStep::Special));
/// assert_eq!(
///     stepper.next(ParsingStep::Form, false),
///     StepperState::Failed(ParsingStep::Form)
/// );
/// assert_eq!(
///     stepper.next(ParsingStep::FormAndStat, true),
///     StepperState::At(ParsingStep::Condition)
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Stepper;

impl Stepper {
    pub fn new() -> Self {
        Stepper
    }

    pub fn initial(&self) -> StepperState {
        StepperState::At(ParsingStep::Special)
    }

    /// Whether a step keeps matching until it stops making progress.
    ///
    /// Steps that fix a form or a stat match at most once: a second match
    /// could only conflict with the first.
    pub fn repeats(&self, step: ParsingStep) -> bool {
        matches!(
            step,
            ParsingStep::StatManipulation
                | ParsingStep::ValueConversion
                | ParsingStep::Condition
                | ParsingStep::ActionCondition
        )
    }

    /// The state after `step` ran; `matched` is true if it matched at
    /// least once.
    pub fn next(&self, step: ParsingStep, matched: bool) -> StepperState {
        use ParsingStep::*;
        use StepperState::{At, Done, Failed};

        match (step.priority_group(), matched) {
            (Special, true) => Done,
            (Special, false) => At(StatManipulation),
            (StatManipulation, _) => At(ValueConversion),
            (ValueConversion, _) => At(FormAndStat),
            (FormAndStat, true) => At(Condition),
            (FormAndStat, false) => At(Keystone),
            (Keystone, true) => At(Condition),
            (Keystone, false) => At(Form),
            (Form, true) => At(GeneralStat),
            (Form, false) => Failed(Form),
            (GeneralStat | DamageStat | PoolStat, true) => At(Condition),
            (GeneralStat | DamageStat | PoolStat, false) => Failed(GeneralStat),
            (Condition, _) => At(ActionCondition),
            (ActionCondition, _) => Done,
        }
    }
}
