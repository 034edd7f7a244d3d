// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result};
use std::hash::Hash;
use std::rc::Rc;

use crate::model::heap::ObjId;
use crate::model::statement::CallSiteId;
use crate::util::index::{new_index_type, IndexVec};

new_index_type! {
    /// The unique identifier for each context. Opaque to the solver, which
    /// only ever compares and hashes it.
    pub struct ContextId;
}

pub trait ContextElement: Clone + Eq + PartialEq + Debug + Hash {}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Context<E: ContextElement> {
    pub(crate) context_elems: Vec<E>,
}

impl<E: ContextElement> Debug for Context<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.context_elems.fmt(f)
    }
}

impl<E: ContextElement> Context<E> {
    pub fn new_empty() -> Rc<Self> {
        Rc::new(Context {
            context_elems: Vec::new(),
        })
    }

    pub fn new(context_elems: Vec<E>) -> Rc<Self> {
        Rc::new(Context { context_elems })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.context_elems.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.context_elems.is_empty()
    }

    /// Compose a new context from a given context and a new context element.
    /// Discard the oldest context elements if the length exceeds the depth
    /// limit.
    pub fn new_k_limited_context(old_ctx: &Rc<Context<E>>, elem: E, k: usize) -> Rc<Self> {
        let mut elems = Vec::with_capacity(k);
        if k > 0 {
            elems.push(elem);
            if old_ctx.len() < k {
                elems.extend_from_slice(&old_ctx.context_elems[..])
            } else {
                elems.extend_from_slice(&old_ctx.context_elems[..k - 1])
            }
        }
        Rc::new(Context { context_elems: elems })
    }

    pub fn k_limited_context(ctx: &Rc<Context<E>>, k: usize) -> Rc<Self> {
        if ctx.len() <= k {
            ctx.clone()
        } else {
            let elems = ctx.context_elems[..k].to_vec();
            Rc::new(Context { context_elems: elems })
        }
    }

    pub fn first_context_element(&self) -> Option<&E> {
        self.context_elems.first()
    }
}

/// Interns contexts so that each distinct context has a stable identifier
/// for the life of the analysis.
#[derive(Debug)]
pub struct ContextCache<E: ContextElement> {
    context_list: IndexVec<ContextId, Rc<Context<E>>>,
    context_to_index_map: HashMap<Rc<Context<E>>, ContextId>,
}

impl<E: ContextElement> Default for ContextCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ContextElement> ContextCache<E> {
    pub fn new() -> ContextCache<E> {
        ContextCache {
            context_list: IndexVec::new(),
            context_to_index_map: HashMap::new(),
        }
    }

    /// Returns an index that can be used to retrieve the context via
    /// `get_context`.
    pub fn get_context_id(&mut self, context: &Rc<Context<E>>) -> ContextId {
        if let Some(id) = self.context_to_index_map.get(context) {
            *id
        } else {
            let id = self.context_list.push(context.clone());
            self.context_to_index_map.insert(context.clone(), id);
            id
        }
    }

    pub fn get_context(&self, id: ContextId) -> Option<Rc<Context<E>>> {
        self.context_list.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.context_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.context_list.is_empty()
    }
}

// The kinds of context elements supported now.
impl ContextElement for CallSiteId {}

impl ContextElement for ObjId {}

#[cfg(test)]
mod test {
    use super::{Context, ContextCache};
    use crate::model::statement::CallSiteId;
    use crate::util::bit_vec::Idx;

    #[test]
    fn k_limited_composition() {
        let c0: CallSiteId = Idx::new(0);
        let c1: CallSiteId = Idx::new(1);
        let c2: CallSiteId = Idx::new(2);
        let empty = Context::new_empty();
        let a = Context::new_k_limited_context(&empty, c0, 2);
        assert_eq!(a.len(), 1);
        let b = Context::new_k_limited_context(&a, c1, 2);
        assert_eq!(b.len(), 2);
        // The oldest element falls off at the depth limit.
        let c = Context::new_k_limited_context(&b, c2, 2);
        assert_eq!(c.len(), 2);
        assert_eq!(c.first_context_element(), Some(&c2));
    }

    #[test]
    fn cache_interns() {
        let c0: CallSiteId = Idx::new(0);
        let mut cache = ContextCache::new();
        let empty = Context::new_empty();
        let id1 = cache.get_context_id(&empty);
        let ctx = Context::new_k_limited_context(&empty, c0, 1);
        let id2 = cache.get_context_id(&ctx);
        assert_ne!(id1, id2);
        // Structural equality yields the same identifier.
        let ctx2 = Context::new(vec![c0]);
        assert_eq!(cache.get_context_id(&ctx2), id2);
        assert_eq!(cache.get_context(id2).unwrap(), ctx);
    }
}
