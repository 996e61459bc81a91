use std::cmp::Ordering;

use crate::charset::Charset;
use crate::options::WeightPadding;

/// Byte-wise collation (`utf8mb4_0900_bin`). The weight string is the input itself.
pub struct BinaryCollation {
    name: &'static str,
    id: u16,
    charset: Charset,
}

impl BinaryCollation {
    pub const fn new(name: &'static str, id: u16, charset: Charset) -> Self {
        Self { name, id, charset }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn collate(&self, left: &[u8], right: &[u8], right_is_prefix: bool) -> Ordering {
        let left = if right_is_prefix && left.len() > right.len() {
            &left[..right.len()]
        } else {
            left
        };

        left.cmp(right)
    }

    pub fn weight_string(&self, dst: &mut Vec<u8>, src: &[u8], padding: WeightPadding) {
        dst.extend_from_slice(src);

        if padding == WeightPadding::ToCapacity {
            let capacity = dst.capacity();
            dst.resize(capacity, 0);
        }
    }

    pub fn weight_string_len(&self, num_bytes: usize) -> usize {
        num_bytes
    }
}
