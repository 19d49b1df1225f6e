//! Packet dispatcher
//!
//! Applies one complete frame payload to the bridge state. Dispatch is
//! total: every payload maps to a [`Dispatch`] outcome, nothing is
//! allocated, and a bad packet never leaves the state half-applied.

use lumin_protocol::{Device, DeviceRecords, Packet, PacketError, RecordError};

use crate::state::{BridgeState, Upsert};

/// Result of a FullSync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncSummary {
    /// Devices placed in the matrix
    pub stored: u8,
    /// Devices beyond their category's capacity
    pub dropped: u8,
    /// Records with an unknown category
    pub skipped: u8,
}

/// Why a payload changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ignored {
    /// Payload could not be parsed
    Malformed(PacketError),
    /// The host sent a packet only the firmware may send
    UnexpectedValueReport,
}

/// Outcome of dispatching one payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// Matrix cleared
    Reset,
    /// Matrix replaced
    FullSync(SyncSummary),
    /// One device upserted
    DeltaUpdate(Upsert),
    /// Payload discarded
    Ignored(Ignored),
}

/// Apply a frame payload to `state`
pub fn dispatch(state: &mut BridgeState, payload: &[u8]) -> Dispatch {
    let packet = match Packet::parse(payload) {
        Ok(packet) => packet,
        Err(PacketError::UnknownTag(tag)) => {
            warn!("Unknown packet type {}, {} bytes dropped", tag, payload.len());
            return Dispatch::Ignored(Ignored::Malformed(PacketError::UnknownTag(tag)));
        }
        Err(e) => {
            warn!("Malformed packet: {:?}", e);
            return Dispatch::Ignored(Ignored::Malformed(e));
        }
    };

    match packet {
        Packet::ResetDeviceMatrix => {
            state.reset();
            info!("Device matrix reset");
            Dispatch::Reset
        }
        Packet::FullSync(records) => Dispatch::FullSync(apply_full_sync(state, &records)),
        Packet::DeltaUpdate(device) => Dispatch::DeltaUpdate(apply_delta_update(state, device)),
        Packet::ValueReport(_) => {
            warn!("ValueReport received from host, ignored");
            Dispatch::Ignored(Ignored::UnexpectedValueReport)
        }
    }
}

/// Replace the whole matrix with the devices listed in `records`
fn apply_full_sync(state: &mut BridgeState, records: &DeviceRecords<'_>) -> SyncSummary {
    if records.is_truncated() {
        warn!(
            "FullSync claims {} devices but carries {}",
            records.declared_count(),
            records.len()
        );
    }

    state.matrix.clear();
    state.shadow.clear();

    let mut summary = SyncSummary::default();
    for record in records.iter() {
        match record {
            Ok(device) => place(state, device, &mut summary),
            Err(RecordError::UnknownCategory(byte)) => {
                warn!("FullSync record with invalid category {} skipped", byte);
                summary.skipped += 1;
            }
            Err(RecordError::Truncated) => {
                // `iter` only yields whole records
                summary.skipped += 1;
            }
        }
    }

    state.selection.reset_cursors();
    state.selection.set_active(Default::default());
    state.request_redraw();

    info!(
        "FullSync complete: {} stored, {} dropped, {} skipped",
        summary.stored,
        summary.dropped,
        summary.skipped
    );
    summary
}

fn place(state: &mut BridgeState, device: Device, summary: &mut SyncSummary) {
    match state.matrix.push(device) {
        Ok(_) => summary.stored += 1,
        Err(device) => {
            debug!("{:?} full, device {} dropped", device.category, device.id);
            summary.dropped += 1;
        }
    }
}

/// Insert or overwrite a single device
fn apply_delta_update(state: &mut BridgeState, device: Device) -> Upsert {
    let category = device.category;
    let id = device.id;

    let outcome = state.matrix.upsert(device);
    match outcome {
        Upsert::Updated(slot) | Upsert::Inserted(slot) => {
            trace!("DeltaUpdate {:?} id {} -> slot {}", category, id, slot);
            if matches!(outcome, Upsert::Inserted(_)) {
                // A fresh device must not inherit a muted value
                state.shadow.set(category, slot, 0);
            }
        }
        Upsert::Dropped => debug!("{:?} full, device {} dropped", category, id),
    }

    // The change may be on screen
    state.request_redraw();
    outcome
}
