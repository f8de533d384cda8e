//! Clustering decode module

pub mod extract;

/// Union-Find data structure for reconstructing equivalence classes from a
/// solved pairwise same-cluster relation.
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of vertex i)
    parent: Vec<u32>,

    /// Size of each set (for union by rank)
    rank: Vec<u32>,
}

impl DisjointSets {
    /// Create a structure with every vertex in its own set
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![1; size],
        }
    }

    /// Find the root of the set containing x, with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let px = self.parent[x as usize];
        if px != x {
            self.parent[x as usize] = self.find(px);
        }
        self.parent[x as usize]
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Union by rank: attach the smaller tree under the larger root
        if self.rank[root_x as usize] > self.rank[root_y as usize] {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += self.rank[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += self.rank[root_x as usize];
        }
    }
}
