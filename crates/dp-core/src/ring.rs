//! Ring topology.
//!
//! Adjacency is derived from the ring size, never stored:
//!
//!   left(i)  = (i − 1) mod N
//!   right(i) = (i + 1) mod N
//!
//! With N = 2 both directions lead to the same peer; [`Ring::neighbors`]
//! deduplicates so callers never count that peer twice.  N < 2 has no
//! meaningful neighborhood and is rejected.

use crate::{AgentId, DpError, DpResult};

/// Smallest ring the protocol accepts.
pub const MIN_RING_SIZE: usize = 2;

/// A cyclic arrangement of `size` agents.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Ring {
    size: u32,
}

impl Ring {
    /// Validate `size` and build the ring.
    pub fn new(size: usize) -> DpResult<Self> {
        if size < MIN_RING_SIZE {
            return Err(DpError::RingTooSmall { size });
        }
        let size = u32::try_from(size)
            .map_err(|_| DpError::Config(format!("ring size {size} exceeds u32::MAX")))?;
        Ok(Self { size })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// `Ok(id)` when `id` sits on this ring.
    #[inline]
    pub fn check(&self, id: AgentId) -> DpResult<AgentId> {
        if id.0 < self.size {
            Ok(id)
        } else {
            Err(DpError::AgentOutOfRange { id, size: self.size() })
        }
    }

    #[inline]
    pub fn left(&self, id: AgentId) -> AgentId {
        let i = id.0 % self.size;
        AgentId(if i == 0 { self.size - 1 } else { i - 1 })
    }

    #[inline]
    pub fn right(&self, id: AgentId) -> AgentId {
        let i = id.0 % self.size;
        AgentId(if i + 1 == self.size { 0 } else { i + 1 })
    }

    /// The distinct neighbors of `id`: two for N ≥ 3, one for N = 2.
    pub fn neighbors(&self, id: AgentId) -> Neighbors {
        let left = self.left(id);
        let right = self.right(id);
        if left == right {
            Neighbors { ids: [left, right], len: 1 }
        } else {
            Neighbors { ids: [left, right], len: 2 }
        }
    }

    /// `true` when `a` and `b` are at ring distance 1.
    pub fn are_adjacent(&self, a: AgentId, b: AgentId) -> bool {
        a != b && (self.left(a) == b || self.right(a) == b)
    }

    /// Every id on the ring in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + use<> {
        (0..self.size).map(AgentId)
    }
}

/// Up to two distinct neighbors, left first.
#[derive(Copy, Clone, Debug)]
pub struct Neighbors {
    ids: [AgentId; 2],
    len: usize,
}

impl Neighbors {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[AgentId] {
        &self.ids[..self.len]
    }
}

impl IntoIterator for Neighbors {
    type Item = AgentId;
    type IntoIter = std::iter::Take<std::array::IntoIter<AgentId, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter().take(self.len)
    }
}
