/// Set of the 32 slots of a trie node.
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

    /// Returns a position of a slot in a dense array of set slots.
    pub fn index(&self, i: u8) -> usize {
        (self.0 & ((1 << i) - 1)).count_ones() as usize
    }

    #[cfg(test)]
    pub fn size(&self) -> usize {
        self.0.count_ones() as usize
    }
}
