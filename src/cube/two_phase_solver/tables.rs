//! The full set of move and pruning tables the solver needs for one piece layout, and a cache so
//! that they are only built once.

use super::move_tables::{
    COMoveTable, DominoCPMoveTable, DominoEPMoveTable, DominoESliceMoveTable, EOMoveTable,
    ESliceEdgeMoveTable,
};
use super::prune::{
    DominoSliceCPPruneTable, DominoSliceEPPruneTable, ESliceFlipPruneTable,
    ESliceTwistPruneTable, TwistFlipPruneTable,
};
use crate::cube::{CubeSize, Layout};
use crate::error::TableError;

use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::ScopedJoinHandle;
use std::time::Instant;

/// Move and pruning tables for every cube size sharing a piece layout. Immutable once built.
pub struct Tables {
    layout: Layout,
    pub(super) co: Arc<COMoveTable>,
    pub(super) eo: Arc<EOMoveTable>,
    pub(super) slice: Arc<ESliceEdgeMoveTable>,
    pub(super) cp: Arc<DominoCPMoveTable>,
    pub(super) ep: Arc<DominoEPMoveTable>,
    pub(super) d_slice: Arc<DominoESliceMoveTable>,
    pub(super) twist_flip: TwistFlipPruneTable,
    pub(super) twist_slice: ESliceTwistPruneTable,
    pub(super) flip_slice: ESliceFlipPruneTable,
    pub(super) cp_slice: DominoSliceCPPruneTable,
    pub(super) ep_slice: DominoSliceEPPruneTable,
}

fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|e| std::panic::resume_unwind(e))
}

impl Tables {
    /// Build every table for the layout of `size`. Each table is built on its own thread, the
    /// move tables first since the pruning tables are searched through them.
    pub fn generate(size: CubeSize) -> Result<Tables, TableError> {
        let start = Instant::now();
        info!("Generating tables for {size} ({:?})", size.layout());

        let (co, eo, slice, cp, ep, d_slice) = std::thread::scope(|s| {
            let co = s.spawn(|| COMoveTable::generate(size));
            let eo = s.spawn(|| EOMoveTable::generate(size));
            let slice = s.spawn(|| ESliceEdgeMoveTable::generate(size));
            let cp = s.spawn(|| DominoCPMoveTable::generate(size));
            let ep = s.spawn(|| DominoEPMoveTable::generate(size));
            let d_slice = s.spawn(|| DominoESliceMoveTable::generate(size));

            Ok::<_, TableError>((
                Arc::new(join(co)?),
                Arc::new(join(eo)?),
                Arc::new(join(slice)?),
                Arc::new(join(cp)?),
                Arc::new(join(ep)?),
                Arc::new(join(d_slice)?),
            ))
        })?;
        debug!("Move tables done after {:?}", start.elapsed());

        let (twist_flip, twist_slice, flip_slice, cp_slice, ep_slice) = std::thread::scope(|s| {
            let twist_flip = s.spawn(|| {
                TwistFlipPruneTable::generate("twist/flip", size, co.clone(), eo.clone())
            });
            let twist_slice = s.spawn(|| {
                ESliceTwistPruneTable::generate("twist/choice", size, co.clone(), slice.clone())
            });
            let flip_slice = s.spawn(|| {
                ESliceFlipPruneTable::generate("flip/choice", size, eo.clone(), slice.clone())
            });
            let cp_slice = s.spawn(|| {
                DominoSliceCPPruneTable::generate("corners/slice", size, cp.clone(), d_slice.clone())
            });
            let ep_slice = s.spawn(|| {
                DominoSliceEPPruneTable::generate("edges/slice", size, ep.clone(), d_slice.clone())
            });

            Ok::<_, TableError>((
                join(twist_flip)?,
                join(twist_slice)?,
                join(flip_slice)?,
                join(cp_slice)?,
                join(ep_slice)?,
            ))
        })?;

        info!(
            "Generated tables for {:?} in {:?}: {} twists, {} flips, {} corner permutations, phase 1 depth at least {}, phase 2 depth at least {}",
            size.layout(),
            start.elapsed(),
            co.len(),
            eo.len(),
            cp.len(),
            twist_flip
                .max_depth()
                .max(twist_slice.max_depth())
                .max(flip_slice.max_depth()),
            cp_slice.max_depth().max(ep_slice.max_depth()),
        );

        Ok(Tables {
            layout: size.layout(),
            co,
            eo,
            slice,
            cp,
            ep,
            d_slice,
            twist_flip,
            twist_slice,
            flip_slice,
            cp_slice,
            ep_slice,
        })
    }

    /// The piece layout these tables were built for.
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

/// Builds tables on first use and hands out shared copies afterwards, one set per piece layout.
/// Share one cache between every solver that should reuse the same tables.
#[derive(Default)]
pub struct TableCache {
    tables: Mutex<HashMap<Layout, Arc<Tables>>>,
}

impl TableCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the tables for cubes of the given size, building them if no size with the same layout
    /// has asked for them yet. Other callers wait while tables are built.
    pub fn get(&self, size: CubeSize) -> Result<Arc<Tables>, TableError> {
        // A panic while building leaves nothing half inserted, so a poisoned map is still valid
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(t) = tables.get(&size.layout()) {
            debug!("Reusing tables for {:?}", size.layout());
            return Ok(t.clone());
        }

        let t = Arc::new(Tables::generate(size)?);
        tables.insert(size.layout(), t.clone());
        Ok(t)
    }

    /// Whether tables for this layout have been built.
    pub fn contains(&self, layout: Layout) -> bool {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&layout)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn cache_shares_tables_per_layout() {
        let cache = TableCache::new();
        assert!(!cache.contains(Layout::CornersOnly));

        let two = cache.get(CubeSize::TWO).unwrap();
        assert_eq!(two.layout(), Layout::CornersOnly);
        assert!(cache.contains(Layout::CornersOnly));
        assert!(!cache.contains(Layout::CornersAndEdges));
        assert!(Arc::ptr_eq(&two, &cache.get(CubeSize::TWO).unwrap()));

        let three = cache.get(CubeSize::THREE).unwrap();
        let six = cache.get(CubeSize::new(6).unwrap()).unwrap();
        assert!(Arc::ptr_eq(&three, &six));
        assert!(!Arc::ptr_eq(&two, &three));
    }

    #[test_log::test]
    fn corners_only_tables_collapse_edges() {
        let tables = Tables::generate(CubeSize::TWO).unwrap();
        assert_eq!(tables.co.len(), 2187);
        assert_eq!(tables.eo.len(), 1);
        assert_eq!(tables.slice.len(), 1);
        assert_eq!(tables.cp.len(), 40320);
        assert_eq!(tables.ep.len(), 1);
        assert_eq!(tables.d_slice.len(), 1);
    }
}
