//! Fixed-length vector of Boolean node values.

use bn_core::NodeIndex;

/// The value of every node in a network, indexed by [`NodeIndex`].
///
/// The length is fixed when the vector is built: there is no `push`, `pop`
/// or `resize`, so an index handed out by an engine stays valid for as long
/// as the vector lives.  Individual values are read with [`get`](Self::get)
/// and written with [`get_mut`](Self::get_mut); both return `None` for an
/// index outside the network.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeStates(Vec<bool>);

impl NodeStates {
    /// `len` nodes, all inactive.
    pub fn new(len: usize) -> Self {
        Self(vec![false; len])
    }

    pub fn from_vec(values: Vec<bool>) -> Self {
        Self(values)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<bool> {
        self.0.get(index.index()).copied()
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut bool> {
        self.0.get_mut(index.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Number of nodes currently `true`.
    pub fn count_active(&self) -> usize {
        self.0.iter().filter(|&&v| v).count()
    }
}

impl FromIterator<bool> for NodeStates {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
