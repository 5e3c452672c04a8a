#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    payload_size: usize,
    capacity: usize,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, payload_size: usize, capacity: usize) -> Self {
        Self { name, group, payload_size, capacity }
    }

    pub fn small(name: &'static str, capacity: usize) -> Self {
        Self::new(name, TestGroup::Small, 16 * 1024, capacity)
    }

    pub fn normal(name: &'static str, capacity: usize) -> Self {
        Self::new(name, TestGroup::Normal, 1024 * 1024, capacity)
    }

    pub fn large(name: &'static str, capacity: usize) -> Self {
        Self::new(name, TestGroup::Large, 16 * 1024 * 1024, capacity)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn payload_size(&self) -> usize {
        self.payload_size
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The payload written by the producer, `i mod 256` for every byte.
    pub fn payload(&self) -> Vec<u8> {
        (0..self.payload_size).map(|i| (i % 256) as u8).collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
