// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! `sh:and`, `sh:or`, `sh:xone` and `sh:not`.

use oxrdf::Term;

use crate::constraints::{ConstraintKind, ViolationDraft};
use crate::model::{NodeShape, ShapeHandle, ShapeId};

/// Evaluation was stopped because the unit ran out of time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeadlineExceeded;

/// Whether a focus node conforms to a shape,
/// as seen from the shape that references it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conformance {
    pub conforms: bool,
    /// Failures of the nested evaluation itself
    /// (e.g. hitting the depth limit),
    /// which have to be reported by the referencing shape.
    pub escalated: Vec<ViolationDraft>,
}

/// Evaluates a focus node against a referenced shape.
pub trait ShapeEvaluator {
    /// `depth` is the depth of the referenced (nested) evaluation.
    ///
    /// # Errors
    ///
    /// If the unit ran out of time.
    fn conformance(
        &self,
        shape: ShapeHandle,
        focus: &Term,
        depth: usize,
    ) -> Result<Conformance, DeadlineExceeded>;

    fn shape_id(&self, shape: ShapeHandle) -> &ShapeId;
}

/// Collects what nested evaluations escalated,
/// keeping only the first, so deep cycles report once per level.
#[derive(Default)]
struct Escalations(Option<ViolationDraft>);

impl Escalations {
    fn absorb(&mut self, conformance: Conformance) -> bool {
        if self.0.is_none() {
            self.0 = conformance.escalated.into_iter().next();
        }
        conformance.conforms
    }
}

/// Evaluates the logical combinators of `shape` for `focus`,
/// at the given depth of the referencing shape.
///
/// # Errors
///
/// If the unit ran out of time.
pub fn evaluate_logical<E: ShapeEvaluator + ?Sized>(
    focus: &Term,
    shape: &NodeShape,
    engine: &E,
    depth: usize,
) -> Result<Vec<ViolationDraft>, DeadlineExceeded> {
    let mut drafts = Vec::new();
    let mut escalations = Escalations::default();
    let nested = depth + 1;

    for member in &shape.and {
        if !escalations.absorb(engine.conformance(*member, focus, nested)?) {
            drafts.push(
                ViolationDraft::new(
                    ConstraintKind::And,
                    format!(
                        "{focus} does not conform to {}, which is required by sh:and",
                        engine.shape_id(*member)
                    ),
                )
                .with_value(focus.clone()),
            );
            break;
        }
    }

    if !shape.or.is_empty() {
        let mut any = false;
        for member in &shape.or {
            if escalations.absorb(engine.conformance(*member, focus, nested)?) {
                any = true;
                break;
            }
        }
        if !any {
            drafts.push(
                ViolationDraft::new(
                    ConstraintKind::Or,
                    format!(
                        "{focus} conforms to none of the {} sh:or alternatives",
                        shape.or.len()
                    ),
                )
                .with_value(focus.clone()),
            );
        }
    }

    if !shape.xone.is_empty() {
        let mut conforming = 0_usize;
        for member in &shape.xone {
            if escalations.absorb(engine.conformance(*member, focus, nested)?) {
                conforming += 1;
            }
        }
        if conforming != 1 {
            drafts.push(
                ViolationDraft::new(
                    ConstraintKind::Xone,
                    format!(
                        "{focus} conforms to {conforming} of the {} sh:xone alternatives, instead of exactly one",
                        shape.xone.len()
                    ),
                )
                .with_value(focus.clone()),
            );
        }
    }

    if let Some(negated) = shape.not {
        if escalations.absorb(engine.conformance(negated, focus, nested)?) {
            drafts.push(
                ViolationDraft::new(
                    ConstraintKind::Not,
                    format!(
                        "{focus} conforms to {}, which is forbidden by sh:not",
                        engine.shape_id(negated)
                    ),
                )
                .with_value(focus.clone()),
            );
        }
    }

    drafts.extend(escalations.0);
    Ok(drafts)
}
