//! Read-only chain access for the difficulty core.

/// A block's position and header summary as seen by the difficulty core.
///
/// Immutable once observed; the core never writes chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockIndex {
    /// Height of the block; genesis is height 0.
    pub height: i32,
    /// Block time, seconds since the Unix epoch.
    pub time: i64,
    /// Compact difficulty target carried in the block header.
    pub bits: u32,
}

/// Read-only view over one consistent chain snapshot.
///
/// The difficulty core walks the chain exclusively through this interface;
/// implementations may back it with an array, a map, or a persistent
/// structure. `ancestor` is a contract: the core only passes heights within
/// `0..=index.height`, and a view that cannot satisfy such a lookup must
/// panic rather than return wrong data.
pub trait ChainView {
    /// The current tip of the chain.
    fn tip(&self) -> BlockIndex;

    /// The parent of `index`, or `None` at genesis.
    fn prev(&self, index: &BlockIndex) -> Option<BlockIndex>;

    /// The ancestor of `index` at the given absolute height.
    fn ancestor(&self, index: &BlockIndex, height: i32) -> BlockIndex;
}

/// Array-backed [`ChainView`] holding every header summary from genesis.
#[derive(Debug, Clone)]
pub struct HeaderChain {
    entries: Vec<BlockIndex>,
}

impl HeaderChain {
    /// Creates a chain containing only a genesis summary.
    pub fn new(genesis_time: i64, genesis_bits: u32) -> Self {
        Self {
            entries: vec![BlockIndex {
                height: 0,
                time: genesis_time,
                bits: genesis_bits,
            }],
        }
    }

    /// Appends a block at the next height and returns its summary.
    pub fn push(&mut self, time: i64, bits: u32) -> BlockIndex {
        let index = BlockIndex {
            height: self.entries.len() as i32,
            time,
            bits,
        };
        self.entries.push(index);
        index
    }

    /// Height of the current tip.
    pub fn tip_height(&self) -> i32 {
        self.entries.len() as i32 - 1
    }
}

impl ChainView for HeaderChain {
    fn tip(&self) -> BlockIndex {
        self.entries[self.entries.len() - 1]
    }

    fn prev(&self, index: &BlockIndex) -> Option<BlockIndex> {
        if index.height == 0 {
            None
        } else {
            Some(self.entries[index.height as usize - 1])
        }
    }

    fn ancestor(&self, index: &BlockIndex, height: i32) -> BlockIndex {
        assert!(
            height >= 0 && height <= index.height,
            "ancestor height {height} out of range for tip height {}",
            index.height
        );
        self.entries[height as usize]
    }
}
