// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Context-sensitivity policies. The solver is generic over a selector and
//! never inspects a context beyond its identifier; the selector owns the
//! interning cache for the contexts it produces.

use std::rc::Rc;

use crate::cs::{CSCallSite, CSMethod, CSObj};
use crate::model::heap::ObjId;
use crate::model::method::MethodId;
use crate::model::statement::CallSiteId;
use crate::pta::context::{Context, ContextCache, ContextId};

pub trait ContextSelector {
    /// The context entry methods, class initializers and context-free
    /// elements live under.
    fn default_context(&mut self) -> ContextId;

    /// The context for the target of a call edge. `recv` is the receiver
    /// object for instance calls and `None` for static calls.
    fn select_context(
        &mut self,
        callsite: CSCallSite,
        recv: Option<CSObj>,
        callee: MethodId,
    ) -> ContextId;

    /// The heap context for an object allocated while analyzing `method`.
    fn select_heap_context(&mut self, method: CSMethod, obj: ObjId) -> ContextId;
}

/// The degenerate policy: every method and object lives under the one empty
/// context.
pub struct ContextInsensitive {
    cache: ContextCache<CallSiteId>,
}

impl Default for ContextInsensitive {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextInsensitive {
    pub fn new() -> Self {
        ContextInsensitive {
            cache: ContextCache::new(),
        }
    }
}

impl ContextSelector for ContextInsensitive {
    fn default_context(&mut self) -> ContextId {
        self.cache.get_context_id(&Context::new_empty())
    }

    fn select_context(
        &mut self,
        _callsite: CSCallSite,
        _recv: Option<CSObj>,
        _callee: MethodId,
    ) -> ContextId {
        self.default_context()
    }

    fn select_heap_context(&mut self, _method: CSMethod, _obj: ObjId) -> ContextId {
        self.default_context()
    }
}

/// k-limited call-site sensitivity (k-CFA): a callee's context is the string
/// of the most recent k call sites; heap contexts are the allocating
/// method's context truncated to `heap_k`.
pub struct KCallSiteSensitive {
    k: usize,
    heap_k: usize,
    cache: ContextCache<CallSiteId>,
}

impl KCallSiteSensitive {
    pub fn new(k: usize) -> Self {
        Self::with_heap_depth(k, k.saturating_sub(1))
    }

    pub fn with_heap_depth(k: usize, heap_k: usize) -> Self {
        KCallSiteSensitive {
            k,
            heap_k,
            cache: ContextCache::new(),
        }
    }

    fn context_of(&self, cid: ContextId) -> Rc<Context<CallSiteId>> {
        self.cache.get_context(cid).unwrap_or_else(Context::new_empty)
    }
}

impl ContextSelector for KCallSiteSensitive {
    fn default_context(&mut self) -> ContextId {
        self.cache.get_context_id(&Context::new_empty())
    }

    fn select_context(
        &mut self,
        callsite: CSCallSite,
        _recv: Option<CSObj>,
        _callee: MethodId,
    ) -> ContextId {
        let caller_ctx = self.context_of(callsite.cid);
        let ctx = Context::new_k_limited_context(&caller_ctx, callsite.call_site, self.k);
        self.cache.get_context_id(&ctx)
    }

    fn select_heap_context(&mut self, method: CSMethod, _obj: ObjId) -> ContextId {
        let method_ctx = self.context_of(method.cid);
        let ctx = Context::k_limited_context(&method_ctx, self.heap_k);
        self.cache.get_context_id(&ctx)
    }
}

/// k-limited object sensitivity: a callee's context is its receiver object
/// prepended to the receiver's heap context. Static calls inherit the
/// caller's context. The object-sensitive policy for this analysis has not
/// been evaluated as thoroughly as call-site sensitivity.
pub struct KObjectSensitive {
    k: usize,
    heap_k: usize,
    cache: ContextCache<ObjId>,
}

impl KObjectSensitive {
    pub fn new(k: usize) -> Self {
        Self::with_heap_depth(k, k.saturating_sub(1))
    }

    pub fn with_heap_depth(k: usize, heap_k: usize) -> Self {
        KObjectSensitive {
            k,
            heap_k,
            cache: ContextCache::new(),
        }
    }

    fn context_of(&self, cid: ContextId) -> Rc<Context<ObjId>> {
        self.cache.get_context(cid).unwrap_or_else(Context::new_empty)
    }
}

impl ContextSelector for KObjectSensitive {
    fn default_context(&mut self) -> ContextId {
        self.cache.get_context_id(&Context::new_empty())
    }

    fn select_context(
        &mut self,
        callsite: CSCallSite,
        recv: Option<CSObj>,
        _callee: MethodId,
    ) -> ContextId {
        match recv {
            Some(recv) => {
                let heap_ctx = self.context_of(recv.cid);
                let ctx = Context::new_k_limited_context(&heap_ctx, recv.obj, self.k);
                self.cache.get_context_id(&ctx)
            }
            // Static calls keep analyzing under the caller's context.
            None => callsite.cid,
        }
    }

    fn select_heap_context(&mut self, method: CSMethod, _obj: ObjId) -> ContextId {
        let method_ctx = self.context_of(method.cid);
        let ctx = Context::k_limited_context(&method_ctx, self.heap_k);
        self.cache.get_context_id(&ctx)
    }
}
