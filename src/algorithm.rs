//! The 32 DX7 routing algorithms and the per-sample router that
//! evaluates them.
//!
//! Every algorithm is a directed modulation graph over six operators
//! with at most one feedback loop. The catalogue stores, per operator,
//! the indices of the operators that phase-modulate it; all of them are
//! strictly greater than the operator's own index. Evaluating operators
//! from index 5 down to 0 therefore turns the graph into a single linear
//! pass: by the time an operator reads its modulators, every one of them
//! has already been written this sample.

use crate::operator::Operator;
use crate::{MODULATION_SCALING, NUM_OPERATORS};

/// One routing graph: modulator adjacency, carrier flags, and the
/// designated feedback operator, if any.
#[derive(Debug)]
pub struct AlgorithmSpec {
    modulators: [&'static [usize]; NUM_OPERATORS],
    carriers: [bool; NUM_OPERATORS],
    feedback_operator: Option<usize>,
}

impl AlgorithmSpec {
    /// Indices of the operators that phase-modulate operator `op`.
    pub fn modulators(&self, op: usize) -> &[usize] {
        self.modulators[op]
    }

    /// Whether operator `op` is summed into the voice output.
    pub fn is_carrier(&self, op: usize) -> bool {
        self.carriers[op]
    }

    pub fn feedback_operator(&self) -> Option<usize> {
        self.feedback_operator
    }

    /// Connection-matrix view: does `modulator` feed `carrier`?
    pub fn modulates(&self, modulator: usize, carrier: usize) -> bool {
        self.modulators[carrier].contains(&modulator)
    }
}

/// Per-sample router. Owns the six-slot modulation scratch buffer; the
/// operators themselves live in the voice.
#[derive(Debug, Default)]
pub struct Algorithm {
    spec: Option<&'static AlgorithmSpec>,
    modulation: [f32; NUM_OPERATORS],
}

impl Algorithm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_spec(&mut self, spec: &'static AlgorithmSpec) {
        self.spec = Some(spec);
    }

    pub fn spec(&self) -> Option<&'static AlgorithmSpec> {
        self.spec
    }

    pub fn clear(&mut self) {
        self.modulation = [0.0; NUM_OPERATORS];
    }

    /// Evaluate one sample: operators from index 5 down to 0, each fed
    /// the scaled sum of its modulators' outputs, carriers summed into
    /// the result.
    #[inline]
    pub fn process(
        &mut self,
        operators: &mut [Operator; NUM_OPERATORS],
        pitch_mod: f32,
        amp_mod: f32,
    ) -> f32 {
        let Some(spec) = self.spec else {
            return 0.0;
        };

        self.modulation = [0.0; NUM_OPERATORS];

        let mut final_output = 0.0;

        for i in (0..NUM_OPERATORS).rev() {
            let mut phase_mod = 0.0;
            for &m in spec.modulators[i] {
                phase_mod += self.modulation[m];
            }
            phase_mod *= MODULATION_SCALING;

            let output = if spec.feedback_operator == Some(i) {
                operators[i].process_feedback(pitch_mod, amp_mod)
            } else {
                operators[i].process(phase_mod, pitch_mod, amp_mod)
            };

            self.modulation[i] = output;

            if spec.carriers[i] {
                final_output += output;
            }
        }

        final_output
    }
}

/// The complete DX7 algorithm catalogue. Indexed 0-31 for hardware
/// algorithms 1-32; operator index 0 is OP1.
pub static CATALOG: [AlgorithmSpec; 32] = [
    // 1: OP2>OP1, OP6>OP5>OP4>OP3; carriers OP1/OP3, feedback OP6
    AlgorithmSpec {
        modulators: [&[1], &[], &[3], &[4], &[5], &[]],
        carriers: [true, false, true, false, false, false],
        feedback_operator: Some(5),
    },
    // 2: OP2>OP1, OP6>OP5>OP4>OP3; carriers OP1/OP3, feedback OP2
    AlgorithmSpec {
        modulators: [&[1], &[], &[3], &[4], &[5], &[]],
        carriers: [true, false, true, false, false, false],
        feedback_operator: Some(1),
    },
    // 3: OP3>OP2>OP1, OP6>OP5>OP4; carriers OP1/OP4, feedback OP6
    AlgorithmSpec {
        modulators: [&[1], &[2], &[], &[4], &[5], &[]],
        carriers: [true, false, false, true, false, false],
        feedback_operator: Some(5),
    },
    // 4: OP3>OP2>OP1, OP6>OP5>OP4; carriers OP1/OP4 (the hardware's
    // OP4>OP6 loop is disabled in this catalogue)
    AlgorithmSpec {
        modulators: [&[1], &[2], &[], &[4], &[5], &[]],
        carriers: [true, false, false, true, false, false],
        feedback_operator: None,
    },
    // 5: OP2>OP1, OP4>OP3, OP6>OP5; carriers OP1/OP3/OP5, feedback OP6
    AlgorithmSpec {
        modulators: [&[1], &[], &[3], &[], &[5], &[]],
        carriers: [true, false, true, false, true, false],
        feedback_operator: Some(5),
    },
    // 6: OP2>OP1, OP4>OP3, OP6>OP5; carriers OP1/OP3/OP5 (the
    // hardware's OP5>OP6 loop is disabled in this catalogue)
    AlgorithmSpec {
        modulators: [&[1], &[], &[3], &[], &[5], &[]],
        carriers: [true, false, true, false, true, false],
        feedback_operator: None,
    },
    // 7: OP2>OP1, OP4+OP5>OP3, OP6>OP5; carriers OP1/OP3, feedback OP6
    AlgorithmSpec {
        modulators: [&[1], &[], &[3, 4], &[], &[5], &[]],
        carriers: [true, false, true, false, false, false],
        feedback_operator: Some(5),
    },
    // 8: as 7; feedback OP4
    AlgorithmSpec {
        modulators: [&[1], &[], &[3, 4], &[], &[5], &[]],
        carriers: [true, false, true, false, false, false],
        feedback_operator: Some(3),
    },
    // 9: as 7; feedback OP2
    AlgorithmSpec {
        modulators: [&[1], &[], &[3, 4], &[], &[5], &[]],
        carriers: [true, false, true, false, false, false],
        feedback_operator: Some(1),
    },
    // 10: OP3>OP2>OP1, OP5+OP6>OP4; carriers OP1/OP4, feedback OP3
    AlgorithmSpec {
        modulators: [&[1], &[2], &[], &[4, 5], &[], &[]],
        carriers: [true, false, false, true, false, false],
        feedback_operator: Some(2),
    },
    // 11: as 10; feedback OP6
    AlgorithmSpec {
        modulators: [&[1], &[2], &[], &[4, 5], &[], &[]],
        carriers: [true, false, false, true, false, false],
        feedback_operator: Some(5),
    },
    // 12: OP2>OP1, OP4+OP5+OP6>OP3; carriers OP1/OP3, feedback OP2
    AlgorithmSpec {
        modulators: [&[1], &[], &[3, 4, 5], &[], &[], &[]],
        carriers: [true, false, true, false, false, false],
        feedback_operator: Some(1),
    },
    // 13: as 12; feedback OP6
    AlgorithmSpec {
        modulators: [&[1], &[], &[3, 4, 5], &[], &[], &[]],
        carriers: [true, false, true, false, false, false],
        feedback_operator: Some(5),
    },
    // 14: OP2>OP1, OP4>OP3, OP5+OP6>OP4, OP6>OP5; carriers OP1/OP3,
    // feedback OP6
    AlgorithmSpec {
        modulators: [&[1], &[], &[3], &[4, 5], &[5], &[]],
        carriers: [true, false, true, false, false, false],
        feedback_operator: Some(5),
    },
    // 15: as 14; feedback OP2
    AlgorithmSpec {
        modulators: [&[1], &[], &[3], &[4, 5], &[5], &[]],
        carriers: [true, false, true, false, false, false],
        feedback_operator: Some(1),
    },
    // 16: OP2+OP3+OP5>OP1, OP4>OP3, OP6>OP5; carrier OP1, feedback OP6
    AlgorithmSpec {
        modulators: [&[1, 2, 4], &[], &[3], &[], &[5], &[]],
        carriers: [true, false, false, false, false, false],
        feedback_operator: Some(5),
    },
    // 17: as 16; feedback OP2
    AlgorithmSpec {
        modulators: [&[1, 2, 4], &[], &[3], &[], &[5], &[]],
        carriers: [true, false, false, false, false, false],
        feedback_operator: Some(1),
    },
    // 18: OP2+OP3+OP4>OP1, OP5>OP4, OP6>OP5; carrier OP1, feedback OP3
    AlgorithmSpec {
        modulators: [&[1, 2, 3], &[], &[], &[4], &[5], &[]],
        carriers: [true, false, false, false, false, false],
        feedback_operator: Some(2),
    },
    // 19: OP2>OP1, OP3>OP2, OP6>OP4 and OP6>OP5; carriers OP1/OP4/OP5,
    // feedback OP6
    AlgorithmSpec {
        modulators: [&[1], &[2], &[], &[5], &[5], &[]],
        carriers: [true, false, false, true, true, false],
        feedback_operator: Some(5),
    },
    // 20: OP3>OP1 and OP3>OP2, OP5+OP6>OP4; carriers OP1/OP2/OP4,
    // feedback OP3
    AlgorithmSpec {
        modulators: [&[2], &[2], &[], &[4, 5], &[], &[]],
        carriers: [true, true, false, true, false, false],
        feedback_operator: Some(2),
    },
    // 21: OP3>OP1 and OP3>OP2, OP6>OP4 and OP6>OP5; carriers
    // OP1/OP2/OP4/OP5, feedback OP3
    AlgorithmSpec {
        modulators: [&[2], &[2], &[], &[5], &[5], &[]],
        carriers: [true, true, false, true, true, false],
        feedback_operator: Some(2),
    },
    // 22: OP2>OP1, OP6>OP3/OP4/OP5; carriers OP1/OP3/OP4/OP5, feedback
    // OP6
    AlgorithmSpec {
        modulators: [&[1], &[], &[5], &[5], &[5], &[]],
        carriers: [true, false, true, true, true, false],
        feedback_operator: Some(5),
    },
    // 23: OP3>OP2, OP6>OP4/OP5; carriers OP1/OP2/OP4/OP5, feedback OP6
    AlgorithmSpec {
        modulators: [&[], &[2], &[], &[5], &[5], &[]],
        carriers: [true, true, false, true, true, false],
        feedback_operator: Some(5),
    },
    // 24: OP6>OP3/OP4/OP5; carriers OP1-OP5, feedback OP6
    AlgorithmSpec {
        modulators: [&[], &[], &[5], &[5], &[5], &[]],
        carriers: [true, true, true, true, true, false],
        feedback_operator: Some(5),
    },
    // 25: OP6>OP4/OP5; carriers OP1-OP5, feedback OP6
    AlgorithmSpec {
        modulators: [&[], &[], &[], &[5], &[5], &[]],
        carriers: [true, true, true, true, true, false],
        feedback_operator: Some(5),
    },
    // 26: OP3>OP2, OP5+OP6>OP4; carriers OP1/OP2/OP4, feedback OP6
    AlgorithmSpec {
        modulators: [&[], &[2], &[], &[4, 5], &[], &[]],
        carriers: [true, true, false, true, false, false],
        feedback_operator: Some(5),
    },
    // 27: as 26; feedback OP3
    AlgorithmSpec {
        modulators: [&[], &[2], &[], &[4, 5], &[], &[]],
        carriers: [true, true, false, true, false, false],
        feedback_operator: Some(2),
    },
    // 28: OP2>OP1, OP4>OP3, OP5>OP4; carriers OP1/OP3/OP6, feedback OP5
    AlgorithmSpec {
        modulators: [&[1], &[], &[3], &[4], &[], &[]],
        carriers: [true, false, true, false, false, true],
        feedback_operator: Some(4),
    },
    // 29: OP4>OP3, OP6>OP5; carriers OP1/OP2/OP3/OP5, feedback OP6
    AlgorithmSpec {
        modulators: [&[], &[], &[3], &[], &[5], &[]],
        carriers: [true, true, true, false, true, false],
        feedback_operator: Some(5),
    },
    // 30: OP4>OP3, OP5>OP4; carriers OP1/OP2/OP3/OP6, feedback OP5
    AlgorithmSpec {
        modulators: [&[], &[], &[3], &[4], &[], &[]],
        carriers: [true, true, true, false, false, true],
        feedback_operator: Some(4),
    },
    // 31: OP6>OP5; carriers OP1-OP5, feedback OP6
    AlgorithmSpec {
        modulators: [&[], &[], &[], &[], &[5], &[]],
        carriers: [true, true, true, true, true, false],
        feedback_operator: Some(5),
    },
    // 32: no modulation; all six operators are carriers, feedback OP6
    AlgorithmSpec {
        modulators: [&[], &[], &[], &[], &[], &[]],
        carriers: [true, true, true, true, true, true],
        feedback_operator: Some(5),
    },
];
