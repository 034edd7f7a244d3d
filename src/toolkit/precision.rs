// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Post-analysis precision classification.
//!
//! Partitions the abstract objects of a finished analysis by type and, in
//! parallel over the independent partitions, measures how widely each
//! type's objects are referenced. Types whose objects are pointed to by a
//! large share of all pointers are flagged as precision-critical: they are
//! the ones a refined context policy would pay off for.
//!
//! This phase only reads the finished result; it never mutates solver
//! state.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::collections::{HashMap, HashSet};

use crate::cs::{CSManager, CSObjId};
use crate::model::ty::TypeId;
use crate::pta::PTDataTy;

const DEFAULT_THRESHOLD: f32 = 0.05;

#[derive(Clone, Debug)]
pub struct TypePrecisionStat {
    pub ty: TypeId,
    /// Number of context-sensitive objects of this type.
    pub num_objects: usize,
    /// Number of distinct pointers referencing any object of this type.
    pub pointed_by: usize,
    /// The largest fan-in of a single object of this type.
    pub max_fan_in: usize,
    pub critical: bool,
}

pub struct PrecisionClassifier {
    threshold: f32,
}

impl Default for PrecisionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PrecisionClassifier {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        PrecisionClassifier { threshold }
    }

    /// Computes per-type statistics over the finished points-to result,
    /// most widely referenced types first.
    pub fn classify(&self, csm: &CSManager, pt_data: &PTDataTy) -> Vec<TypePrecisionStat> {
        let mut partitions: HashMap<TypeId, Vec<CSObjId>> = HashMap::new();
        for (cs_obj_id, _) in csm.cs_objs_iter() {
            partitions
                .entry(csm.cs_obj_type(cs_obj_id))
                .or_default()
                .push(cs_obj_id);
        }
        let total_pointers = csm.num_pointers().max(1);
        let threshold = self.threshold;

        let partitions: Vec<(TypeId, Vec<CSObjId>)> = partitions.into_iter().collect();
        let mut stats: Vec<TypePrecisionStat> = partitions
            .into_par_iter()
            .map(|(ty, objs)| {
                let mut pointed_by: HashSet<_> = HashSet::new();
                let mut max_fan_in = 0;
                for obj in &objs {
                    if let Some(pointers) = pt_data.get_rev_pts(*obj) {
                        max_fan_in = max_fan_in.max(pointers.len());
                        pointed_by.extend(pointers.iter().copied());
                    }
                }
                let critical = pointed_by.len() as f32 > threshold * total_pointers as f32;
                TypePrecisionStat {
                    ty,
                    num_objects: objs.len(),
                    pointed_by: pointed_by.len(),
                    max_fan_in,
                    critical,
                }
            })
            .collect();
        stats.sort_by(|a, b| b.pointed_by.cmp(&a.pointed_by).then(a.ty.cmp(&b.ty)));
        stats
    }

    /// The precision-critical types of the finished result.
    pub fn precision_critical_types(&self, csm: &CSManager, pt_data: &PTDataTy) -> Vec<TypeId> {
        self.classify(csm, pt_data)
            .into_iter()
            .filter(|stat| stat.critical)
            .map(|stat| stat.ty)
            .collect()
    }
}
