//! Value reports towards the host

use lumin_hal::SerialTx;
use lumin_protocol::ValueReport;

use crate::state::BridgeState;

/// Write one ValueReport frame to `tx`
///
/// Returns false if the transport refused the bytes. A failed report is
/// not retried; the host resynchronises on its own schedule.
pub fn send<T: SerialTx>(tx: &mut T, report: &ValueReport) -> bool {
    match tx.write_bytes(&report.encode_frame()) {
        Ok(()) => {
            trace!(
                "ValueReport id {} value {} sent",
                report.id,
                report.value
            );
            true
        }
        Err(_) => {
            warn!("ValueReport for id {} not sent", report.id);
            false
        }
    }
}

/// Report the device under the cursor, if there is one
pub fn send_selected<T: SerialTx>(tx: &mut T, state: &BridgeState) -> Option<ValueReport> {
    let report = ValueReport::for_device(state.selected_device()?);
    send(tx, &report).then_some(report)
}
