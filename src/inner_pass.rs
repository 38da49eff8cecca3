use std::sync::Arc;

use num_integer::Integer;

use crate::algorithm::radixn::RadixFactor;
use crate::arena::Arena;
use crate::twiddles;
use crate::vector::LaneVector;
use crate::PlanError;

/// One radix stage of an inner transform chain.
///
/// A pass of length `n = radix * len_div_radix` splits its input into `radix` strided
/// sub-sequences and hands the `len_div_radix`-point remainder to `next`. Passes are shared
/// between every chain that reaches the same length.
#[derive(Debug)]
pub(crate) struct InnerPass {
    radix: RadixFactor,
    len_div_radix: usize,
    twiddles: Box<[f32]>,
    next: Option<Arc<InnerPass>>,
}

impl InnerPass {
    pub fn len(&self) -> usize {
        self.radix.radix() * self.len_div_radix
    }

    pub fn radix(&self) -> usize {
        self.radix.radix()
    }

    pub fn next(&self) -> Option<&Arc<InnerPass>> {
        self.next.as_ref()
    }

    /// Collects the chain starting at `self`, longest pass first.
    pub fn chain(self: &Arc<Self>) -> Vec<Arc<InnerPass>> {
        let mut chain = vec![Arc::clone(self)];
        while let Some(next) = chain.last().and_then(|pass| pass.next().cloned()) {
            chain.push(next);
        }
        chain
    }

    /// In-place decimation-in-frequency over `nfft` consecutive blocks of this pass's length.
    pub fn dif<V: LaneVector>(&self, buffer: &mut [f32], nfft: usize) {
        if self.next.is_none() {
            self.radix.innermost::<V>(buffer, nfft)
        } else {
            self.radix.dif::<V>(buffer, nfft, self.len_div_radix, &self.twiddles)
        }
    }

    /// In-place decimation-in-time over `nfft` consecutive blocks of this pass's length.
    pub fn dit<V: LaneVector>(&self, buffer: &mut [f32], nfft: usize) {
        if self.next.is_none() {
            self.radix.innermost::<V>(buffer, nfft)
        } else {
            self.radix.dit::<V>(buffer, nfft, self.len_div_radix, &self.twiddles)
        }
    }

    /// Out-of-place Stockham stage; `rows` is the product of the radices of the passes before it.
    pub fn stockham<V: LaneVector>(&self, input: &[f32], output: &mut [f32], rows: usize) {
        self.radix
            .stockham::<V>(input, output, rows, self.len_div_radix, &self.twiddles)
    }
}

/// Picks the radix for the outermost stage of a transform of length `len`.
fn choose_radix(len: usize) -> RadixFactor {
    if let Some(factor) = RadixFactor::from_base_len(len) {
        return factor;
    }
    if len < 2 {
        panic!("Inner transforms require a length of at least 2. Got {}", len);
    }
    if len % 3 == 0 {
        RadixFactor::Factor3
    } else if len % 4 == 0 && len / 4 != 4 && len / 4 != 8 {
        RadixFactor::Factor4
    } else if len.is_even() {
        RadixFactor::Factor2
    } else {
        panic!(
            "Inner transform length {} must factor into 2, 3, 4, 5, 6, 8 and 16",
            len
        );
    }
}

/// All inner passes built by one planner, sorted by descending length.
#[derive(Debug, Default)]
pub(crate) struct InnerPassCache {
    passes: Vec<Arc<InnerPass>>,
}

impl InnerPassCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Finds the pass of length `len`, or the index at which it would be inserted.
    fn search(&self, len: usize) -> Result<usize, usize> {
        for (index, pass) in self.passes.iter().enumerate() {
            if pass.len() == len {
                return Ok(index);
            }
            if pass.len() < len {
                return Err(index);
            }
        }
        Err(self.passes.len())
    }

    /// Returns the shared pass chain computing transforms of length `len`, building and caching
    /// any passes that don't exist yet.
    ///
    /// Panics if `len` is below 2 or has a prime factor other than 2, 3 or 5 (5 only as the
    /// final factor).
    pub fn get_or_build(&mut self, arena: &mut Arena, len: usize) -> Result<Arc<InnerPass>, PlanError> {
        if let Ok(index) = self.search(len) {
            return Ok(Arc::clone(&self.passes[index]));
        }

        let radix = choose_radix(len);
        let len_div_radix = len / radix.radix();
        let next = if len_div_radix == 1 {
            None
        } else {
            Some(self.get_or_build(arena, len_div_radix)?)
        };

        // shorter passes are cached by now and keep their charge
        let pass = arena.transaction(|arena| {
            let twiddles = match next {
                Some(_) => twiddles::stage_twiddles(arena, radix.radix(), len_div_radix)?,
                None => Box::default(),
            };
            arena.reserve_for::<InnerPass>()?;
            Ok(Arc::new(InnerPass {
                radix,
                len_div_radix,
                twiddles,
                next,
            }))
        })?;

        // the recursive build inserted shorter passes, so search again
        let index = self.search(len).unwrap_or_else(|index| index);
        self.passes.insert(index, Arc::clone(&pass));
        Ok(pass)
    }
}
