use bytes::Bytes;

use crate::fountain::fragments::{choose_fragments, fragment_length, partition, xor_into};
use crate::fountain::types::{FountainError, FountainPart};
use crate::utils::compute_checksum;

/// Stateful part generator for one message.
///
/// The sequence number starts at 1 and only ever grows; the encoder never
/// needs to know which parts the receiver saw.
#[derive(Debug, Clone)]
pub struct FountainEncoder {
    fragments: Vec<Bytes>,
    message_len: u32,
    checksum: u32,
    seq_num: u32,
}

impl FountainEncoder {
    pub fn new(
        message: &[u8],
        max_fragment_len: usize,
        min_fragment_len: usize,
    ) -> Result<Self, FountainError> {
        let fragment_len = fragment_length(message.len(), min_fragment_len, max_fragment_len)?;
        let message_len = u32::try_from(message.len())
            .map_err(|_| FountainError::InvalidPart("message longer than u32::MAX".into()))?;

        let fragments: Vec<Bytes> = partition(message, fragment_len)
            .into_iter()
            .map(Bytes::from)
            .collect();
        if fragments.len() > u16::MAX as usize {
            return Err(FountainError::TooManyFragments { count: fragments.len() });
        }

        Ok(Self {
            fragments,
            message_len,
            // over the unpadded message
            checksum: compute_checksum(message),
            seq_num: 0,
        })
    }

    #[inline]
    pub fn seq_len(&self) -> u32 {
        self.fragments.len() as u32
    }

    #[inline]
    pub fn seq_num(&self) -> u32 {
        self.seq_num
    }

    #[inline]
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    #[inline]
    pub fn message_len(&self) -> u32 {
        self.message_len
    }

    #[inline]
    pub fn fragment_len(&self) -> usize {
        self.fragments.first().map_or(0, Bytes::len)
    }

    /// The whole message fits one fragment.
    #[inline]
    pub fn is_single_part(&self) -> bool {
        self.fragments.len() == 1
    }

    /// True once every pure part has been emitted at least once.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.seq_num >= self.seq_len()
    }

    /// Advance the sequence number and build that part.
    pub fn next_part(&mut self) -> FountainPart {
        self.seq_num = self.seq_num.saturating_add(1);
        self.part_at(self.seq_num)
    }

    /// Build part `seq_num` without touching the running counter.
    pub fn part_at(&self, seq_num: u32) -> FountainPart {
        let seq_num = seq_num.max(1);
        let indexes = choose_fragments(seq_num, self.seq_len(), self.checksum);

        let data = match indexes.single() {
            Some(i) => self.fragments[i].clone(),
            None => {
                let mut mixed = vec![0u8; self.fragment_len()];
                for i in indexes.iter() {
                    xor_into(&mut mixed, &self.fragments[i]);
                }
                Bytes::from(mixed)
            }
        };

        FountainPart {
            seq_num,
            seq_len: self.seq_len(),
            message_len: self.message_len,
            checksum: self.checksum,
            data,
        }
    }
}
