//! Layout persistence protocol
//!
//! The save sequence is full-replace, not incremental diffing: delete every
//! previously persisted table and seat, reconcile areas, recreate
//! everything from the in-memory model, then reload the authoritative
//! layout. A failed step aborts the remainder and leaves the backend
//! partially replaced; there is no rollback (at-least-once semantics,
//! flagged as a known risk).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use floorplan::geometry::{Point, Rect};
use floorplan::model::LayoutModel;
use shared::models::{
    AreaCreate, AreaUpdate, EventLayoutUpdate, OccupiedSet, SeatCreate, Stage, VenueLayout,
    VenueTableCreate,
};

use crate::{ClientConfig, ClientError, ClientResult, HttpClient};

/// One step of the save sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    Renumber,
    Fetch,
    UpdateEvent,
    Purge,
    CreateTables,
    CreateSeats,
    Reload,
    Done,
}

/// Incremental save feedback for the UI
#[derive(Debug, Clone)]
pub struct SaveProgress {
    pub step: SaveStep,
    pub percent: u8,
    pub message: String,
}

/// Callback receiving [`SaveProgress`] updates
pub type ProgressSink = dyn Fn(SaveProgress) + Send + Sync;

/// Summary of one completed save
#[derive(Debug, Clone)]
pub struct SaveReport {
    /// Correlation ID, also attached to the save's log records
    pub save_id: Uuid,
    pub tables_created: usize,
    pub seats_created: usize,
    pub areas_created: usize,
    pub areas_updated: usize,
    pub areas_deleted: usize,
    pub duration: Duration,
}

/// Persistence port for the layout engine
///
/// The interaction engine never talks to the network directly; swapping
/// the full-replace strategy for an incremental one stays behind this
/// trait.
#[async_trait]
pub trait LayoutStore {
    /// Assemble the full authoritative layout for an event
    async fn load_layout(&self, event_id: i64) -> ClientResult<VenueLayout>;

    /// Run the full-replace save sequence, locking the event
    ///
    /// On success the model is rebuilt from the reloaded layout, so all
    /// local IDs become persisted ones. Failure aborts the remaining
    /// steps; the backend may be left partially replaced and the lock
    /// state is whatever the backend holds.
    async fn save_layout(
        &self,
        event_id: i64,
        model: &mut LayoutModel,
        progress: &ProgressSink,
    ) -> ClientResult<SaveReport>;

    /// Clear the layout lock without touching persisted elements
    async fn unlock_layout(&self, event_id: i64) -> ClientResult<()>;

    /// Occupied element IDs for the customer-facing view
    async fn load_occupied(&self, event_id: i64) -> ClientResult<OccupiedSet>;

    /// Load a model, falling back to an empty one on error
    async fn load_model_or_default(&self, event_id: i64) -> LayoutModel {
        match self.load_layout(event_id).await {
            Ok(layout) => LayoutModel::from_layout(&layout),
            Err(e) => {
                warn!(event_id, error = %e, "layout load failed, starting empty");
                LayoutModel::new()
            }
        }
    }
}

/// HTTP-backed layout store
#[derive(Debug)]
pub struct HttpLayoutStore {
    client: HttpClient,
    renumber_start: usize,
    /// In-flight flag: a second save is rejected instead of interleaving
    /// two delete/recreate sequences
    saving: AtomicBool,
}

impl HttpLayoutStore {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: HttpClient::new(config),
            renumber_start: config.renumber_start,
            saving: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Delete one persisted row during the purge phase
    ///
    /// 404 means another actor already removed it; other failures are
    /// logged and skipped so the purge keeps going.
    async fn purge_one<F>(save_id: Uuid, what: &str, id: i64, delete: F)
    where
        F: Future<Output = ClientResult<()>>,
    {
        match delete.await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                warn!(%save_id, what, id, error = %e, "purge delete failed, continuing");
            }
        }
    }
}

/// Resolve the area containing an anchor against final persisted areas
///
/// Overlaps resolve to the smallest surface, ties to the lowest backend
/// ID; same rule the in-memory model applies.
fn infer_area(areas: &[(i64, Rect)], anchor: Point) -> Option<i64> {
    areas
        .iter()
        .filter(|(_, rect)| rect.contains(anchor))
        .min_by(|(a_id, a), (b_id, b)| {
            a.surface()
                .partial_cmp(&b.surface())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a_id.cmp(b_id))
        })
        .map(|(id, _)| *id)
}

/// Releases the in-flight flag when the save ends, on any path
struct SaveGuard<'a>(&'a AtomicBool);

impl<'a> SaveGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> ClientResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::SaveInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[async_trait]
impl LayoutStore for HttpLayoutStore {
    async fn load_layout(&self, event_id: i64) -> ClientResult<VenueLayout> {
        let event = self.client.get_event(event_id).await?;
        let areas = self.client.list_areas(event_id).await?;
        let tables = self.client.list_tables(event_id).await?;
        let seats = self.client.list_seats(event_id).await?;
        let price_tiers = self.client.list_price_tiers(event_id).await?;
        Ok(VenueLayout {
            event,
            areas,
            tables,
            seats,
            price_tiers,
        })
    }

    async fn save_layout(
        &self,
        event_id: i64,
        model: &mut LayoutModel,
        progress: &ProgressSink,
    ) -> ClientResult<SaveReport> {
        let _guard = SaveGuard::acquire(&self.saving)?;
        let save_id = Uuid::new_v4();
        let started = Instant::now();
        let report = |step: SaveStep, percent: u8, message: &str| {
            progress(SaveProgress {
                step,
                percent,
                message: message.to_string(),
            });
        };
        info!(%save_id, event_id, "save sequence started");

        // 1. renumber individual seats; chairs keep their labels
        report(SaveStep::Renumber, 5, "Renumbering seats");
        model.renumber_individual_seats(self.renumber_start);

        // 2. fetch the currently persisted set
        report(SaveStep::Fetch, 15, "Fetching persisted layout");
        let old_tables = self.client.list_tables(event_id).await?;
        let old_seats = self.client.list_seats(event_id).await?;
        let old_areas = self.client.list_areas(event_id).await?;

        // 3. event scalars, locking the layout in the same call
        report(SaveStep::UpdateEvent, 25, "Updating event");
        let update = EventLayoutUpdate {
            shape: Some(model.shape),
            stage: model.stage.map(|r| Stage {
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
            }),
            sheet_width: Some(model.sheet_width),
            sheet_height: Some(model.sheet_height),
            layout_locked: Some(true),
        };
        self.client.update_event(event_id, &update).await?;

        // 4. purge tables, then seats, then reconcile areas
        report(SaveStep::Purge, 40, "Removing previous layout");
        for table in &old_tables {
            Self::purge_one(save_id, "table", table.id, self.client.delete_table(table.id)).await;
        }
        for seat in &old_seats {
            Self::purge_one(save_id, "seat", seat.id, self.client.delete_seat(seat.id)).await;
        }

        let mut areas_created = 0;
        let mut areas_updated = 0;
        let mut areas_deleted = 0;
        let local_ids: Vec<Option<i64>> =
            model.areas().iter().map(|a| a.id.persisted()).collect();
        for old in &old_areas {
            if !local_ids.contains(&Some(old.id)) {
                Self::purge_one(save_id, "area", old.id, self.client.delete_area(old.id)).await;
                areas_deleted += 1;
            }
        }
        // final persisted area rectangles drive area-membership inference
        let mut final_areas: Vec<(i64, Rect)> = Vec::with_capacity(model.areas().len());
        for area in model.areas() {
            match area.id.persisted() {
                Some(id) => {
                    let payload = AreaUpdate {
                        name: Some(area.name.clone()),
                        x: Some(area.rect.x),
                        y: Some(area.rect.y),
                        width: Some(area.rect.width),
                        height: Some(area.rect.height),
                        color: Some(area.color.clone()),
                    };
                    let saved = self.client.update_area(id, &payload).await?;
                    final_areas.push((saved.id, area.rect));
                    areas_updated += 1;
                }
                None => {
                    let payload = AreaCreate {
                        event_id,
                        name: area.name.clone(),
                        x: area.rect.x,
                        y: area.rect.y,
                        width: area.rect.width,
                        height: area.rect.height,
                        color: area.color.clone(),
                    };
                    let saved = self.client.create_area(&payload).await?;
                    final_areas.push((saved.id, area.rect));
                    areas_created += 1;
                }
            }
        }

        // 5. recreate tables, collecting authoritative IDs
        report(SaveStep::CreateTables, 60, "Creating tables");
        // old local IDs die with the purge; chairs find their table again
        // by number + price tier
        let mut table_keys: Vec<((i32, i64), i64)> = Vec::with_capacity(model.table_count());
        for table in model.tables() {
            let payload = VenueTableCreate {
                event_id,
                number: table.number,
                x: table.rect.x,
                y: table.rect.y,
                width: table.rect.width,
                height: table.rect.height,
                chair_capacity: table.chair_capacity,
                price_tier_id: table.price_tier_id,
                area_id: table
                    .area_id
                    .or_else(|| infer_area(&final_areas, table.rect.center())),
            };
            let saved = self.client.create_table(&payload).await?;
            table_keys.push(((table.number, table.price_tier_id), saved.id));
        }

        // 6. recreate seats, resolving chair ownership
        report(SaveStep::CreateSeats, 80, "Creating seats");
        let mut seats_created = 0;
        for seat in model.seats() {
            let table_id = match seat.table_id {
                Some(tid) => {
                    let table = model
                        .table(tid)
                        .ok_or_else(|| {
                            ClientError::Internal(format!("chair references missing table {tid}"))
                        })?;
                    let key = (table.number, table.price_tier_id);
                    Some(
                        table_keys
                            .iter()
                            .find(|(k, _)| *k == key)
                            .map(|(_, id)| *id)
                            .ok_or_else(|| {
                                ClientError::Internal(format!(
                                    "no persisted table for number {} tier {}",
                                    key.0, key.1
                                ))
                            })?,
                    )
                }
                None => None,
            };
            let payload = SeatCreate {
                event_id,
                label: seat.label.clone(),
                x: seat.pos.x,
                y: seat.pos.y,
                price_tier_id: seat.price_tier_id,
                table_id,
                area_id: seat
                    .area_id
                    .or_else(|| infer_area(&final_areas, seat.pos)),
            };
            self.client.create_seat(&payload).await?;
            seats_created += 1;
        }

        // 7. reload; temporary IDs give way to authoritative ones
        report(SaveStep::Reload, 95, "Reloading layout");
        let layout = self.load_layout(event_id).await?;
        *model = LayoutModel::from_layout(&layout);

        let report_out = SaveReport {
            save_id,
            tables_created: table_keys.len(),
            seats_created,
            areas_created,
            areas_updated,
            areas_deleted,
            duration: started.elapsed(),
        };
        info!(
            %save_id,
            event_id,
            tables = report_out.tables_created,
            seats = report_out.seats_created,
            ms = report_out.duration.as_millis() as u64,
            "save sequence finished"
        );
        report(SaveStep::Done, 100, "Layout saved");
        Ok(report_out)
    }

    async fn unlock_layout(&self, event_id: i64) -> ClientResult<()> {
        let update = EventLayoutUpdate {
            layout_locked: Some(false),
            ..Default::default()
        };
        self.client.update_event(event_id, &update).await?;
        info!(event_id, "layout unlocked");
        Ok(())
    }

    async fn load_occupied(&self, event_id: i64) -> ClientResult<OccupiedSet> {
        self.client.occupied(event_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_area_prefers_smallest_surface() {
        let areas = vec![
            (1, Rect::new(0.0, 0.0, 500.0, 500.0)),
            (2, Rect::new(100.0, 100.0, 50.0, 50.0)),
        ];
        assert_eq!(infer_area(&areas, Point::new(120.0, 120.0)), Some(2));
        assert_eq!(infer_area(&areas, Point::new(400.0, 400.0)), Some(1));
        assert_eq!(infer_area(&areas, Point::new(900.0, 900.0)), None);
    }

    #[test]
    fn save_guard_rejects_second_acquire() {
        let flag = AtomicBool::new(false);
        let guard = SaveGuard::acquire(&flag).unwrap();
        assert!(matches!(
            SaveGuard::acquire(&flag),
            Err(ClientError::SaveInProgress)
        ));
        drop(guard);
        assert!(SaveGuard::acquire(&flag).is_ok());
    }
}
