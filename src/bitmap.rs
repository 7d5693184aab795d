/// Presence bitmap of a branch node.
///
/// Bit `i` is set iff the branch holds a child for hash fragment `i`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Bitmap(u32);

impl Bitmap {
    pub fn new() -> Self {
        Bitmap(0)
    }

    pub fn get(&self, i: u8) -> bool {
        self.0 & (1 << i) != 0
    }

    pub fn set(&self, i: u8) -> Self {
        Bitmap(self.0 | (1 << i))
    }

    pub fn unset(&self, i: u8) -> Self {
        Bitmap(self.0 & !(1 << i))
    }

    pub fn size(&self) -> usize {
        count_ones(self.0) as usize
    }

    /// Returns a position of the child for fragment `i` in a dense child
    /// array, i.e. the number of set bits below `i`.
    pub fn index(&self, i: u8) -> usize {
        count_ones(self.0 & ((1 << i) - 1)) as usize
    }
}

#[cfg(target_feature = "popcnt")]
fn count_ones(bits: u32) -> u32 {
    bits.count_ones()
}

#[cfg(not(target_feature = "popcnt"))]
fn count_ones(bits: u32) -> u32 {
    let bits = bits - ((bits >> 1) & 0x5555_5555);
    let bits = (bits & 0x3333_3333) + ((bits >> 2) & 0x3333_3333);

    ((bits + (bits >> 4)) & 0x0f0f_0f0f).wrapping_mul(0x0101_0101) >> 24
}
