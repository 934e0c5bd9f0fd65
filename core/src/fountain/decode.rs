use std::collections::HashSet;

use tracing::{debug, warn};

use crate::fountain::fragments::{choose_fragments, xor_into, FragmentSet};
use crate::fountain::types::{FountainError, FountainPart, PartOutcome, TransferShape};
use crate::utils::compute_checksum;

/// One reduced equation: XOR of the fragments in `indexes` equals `data`.
#[derive(Debug, Clone)]
struct Equation {
    /// Column this equation eliminates from every other one.
    pivot: usize,
    indexes: FragmentSet,
    data: Vec<u8>,
}

impl Equation {
    #[inline]
    fn eliminate(&mut self, other: &Equation) {
        self.indexes.xor_with(&other.indexes);
        xor_into(&mut self.data, &other.data);
    }
}

/// Incremental GF(2) solver for one fountain transfer.
///
/// `equations` is kept in reduced row-echelon form: every equation owns a
/// distinct pivot that appears in no other equation. A fragment is solved
/// once its equation has a single index. Pure parts and the classic
/// "reduce by solved, cascade on solve" behaviour fall out of this as the
/// degree-one special case; mixed parts that only become useful in
/// combination are kept until the system reaches full rank.
#[derive(Debug, Default)]
pub struct FountainDecoder {
    shape: Option<TransferShape>,
    equations: Vec<Equation>,
    solved: usize,
    received: HashSet<u32>,
    result: Option<Vec<u8>>,
}

impl FountainDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn shape(&self) -> Option<TransferShape> {
        self.shape
    }

    #[inline]
    pub fn seq_len(&self) -> Option<u32> {
        self.shape.map(|s| s.seq_len)
    }

    #[inline]
    pub fn solved_fragments(&self) -> usize {
        self.solved
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&[u8]> {
        self.result.as_deref()
    }

    pub fn take_result(&mut self) -> Option<Vec<u8>> {
        self.result.take()
    }

    /// Solved fraction in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.result.is_some() {
            return 1.0;
        }
        match self.shape {
            Some(shape) => self.solved as f64 / shape.seq_len as f64,
            None => 0.0,
        }
    }

    /// Feed one part.
    ///
    /// A checksum mismatch on completion resets the decoder and is returned
    /// as an error; the unchecked bytes are dropped.
    pub fn receive(&mut self, part: &FountainPart) -> Result<PartOutcome, FountainError> {
        part.validate()?;

        let mut outcome = PartOutcome::Progress;
        let shape = part.shape();
        match self.shape {
            None => self.shape = Some(shape),
            Some(current) if current != shape => {
                warn!(
                    old_len = current.seq_len,
                    new_len = shape.seq_len,
                    "fountain header changed, restarting transfer"
                );
                self.reset();
                self.shape = Some(shape);
                outcome = PartOutcome::Restarted;
            }
            Some(_) => {}
        }

        if self.result.is_some() || !self.received.insert(part.seq_num) {
            return Ok(PartOutcome::Duplicate);
        }

        let mut indexes = choose_fragments(part.seq_num, shape.seq_len, shape.checksum);
        let mut data = part.data.to_vec();

        // an equation holds no pivot column but its own, so one pass clears them all
        for eq in &self.equations {
            if indexes.contains(eq.pivot) {
                indexes.xor_with(&eq.indexes);
                xor_into(&mut data, &eq.data);
            }
        }

        let Some(pivot) = indexes.first() else {
            debug!(seq = part.seq_num, "fountain part carries no new information");
            return Ok(if outcome == PartOutcome::Restarted { outcome } else { PartOutcome::Redundant });
        };
        let incoming = Equation { pivot, indexes, data };

        for eq in self.equations.iter_mut() {
            if eq.indexes.contains(pivot) {
                eq.eliminate(&incoming);
            }
        }
        self.equations.push(incoming);
        self.solved = self.equations.iter().filter(|eq| eq.indexes.len() == 1).count();

        if self.solved == shape.seq_len as usize {
            self.finish(shape)?;
            return Ok(PartOutcome::Complete);
        }
        Ok(outcome)
    }

    fn finish(&mut self, shape: TransferShape) -> Result<(), FountainError> {
        let mut fragments: Vec<(usize, Vec<u8>)> = self
            .equations
            .drain(..)
            .filter_map(|eq| eq.indexes.single().map(|i| (i, eq.data)))
            .collect();
        fragments.sort_unstable_by_key(|(i, _)| *i);

        let mut message: Vec<u8> = fragments.into_iter().flat_map(|(_, d)| d).collect();
        message.truncate(shape.message_len as usize);

        let actual = compute_checksum(&message);
        if actual != shape.checksum {
            warn!(expected = shape.checksum, actual, "fountain checksum mismatch, dropping transfer");
            self.reset();
            return Err(FountainError::ChecksumMismatch { expected: shape.checksum, actual });
        }

        debug!(len = message.len(), "fountain message reassembled");
        self.result = Some(message);
        Ok(())
    }
}

/// Convenience for tests and tools: decode a finite part list.
pub fn decode_parts<'a, I>(parts: I) -> Result<Option<Vec<u8>>, FountainError>
where
    I: IntoIterator<Item = &'a FountainPart>,
{
    let mut decoder = FountainDecoder::new();
    for part in parts {
        decoder.receive(part)?;
        if decoder.is_complete() {
            break;
        }
    }
    Ok(decoder.take_result())
}
