use super::synth::{Fragments, Patch};
use super::tac::Tac;
use crate::error::{Diag, Error};

/// Bind every allocated label to its target fragment and fill in jump targets.
/// Jumps without a target stay `jump to ?` and are reported.
pub fn patch(frags: &mut Fragments, patches: &[Patch]) -> Vec<Diag> {
    let mut diags = Vec::new();
    for &patch in patches {
        match patch {
            Patch::Mark { label, target } => {
                frags.entry(target).or_default().labels.push(label);
            }
            Patch::Jump {
                label,
                from,
                target: Some(target),
                ..
            } => {
                frags.entry(target).or_default().labels.push(label);
                for inst in &mut frags.entry(from).or_default().insts {
                    if let Tac::IfFalse(_, dest) = inst {
                        *dest = Some(label);
                    }
                }
            }
            Patch::Jump {
                target: None,
                line,
                looped,
                ..
            } => {
                let e = if looped {
                    Error::UnresolvedLoopExit(line)
                } else {
                    Error::UnresolvedBranch(line)
                };
                diags.push(Diag::error(line, e));
            }
        }
    }
    diags
}
