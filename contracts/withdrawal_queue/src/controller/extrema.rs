use soroban_sdk::Env;
use tidal::error::TidalResult;

use crate::{
    controller::queue::calc_batch,
    events::WithdrawalQueueEvents,
    storage::{
        get_last_request_id,
        get_report_state,
        get_request,
        push_extremum,
        save_report_state,
        RateDirection,
        ReportState,
    },
};

fn direction(prev_rate: i128, rate: i128) -> RateDirection {
    if rate > prev_rate {
        RateDirection::Rising
    } else if rate < prev_rate {
        RateDirection::Falling
    } else {
        RateDirection::Flat
    }
}

/// Closes the segment of requests created since the previous report.
///
/// All requests of a segment share one share rate. When the segment moves the rate in
/// the opposite direction of the previous move, the end of the previous segment is a
/// local extremum and gets recorded.
pub fn on_report(env: &Env) -> TidalResult<Option<u64>> {
    let state = get_report_state(env);
    let last_request_id = get_last_request_id(env);

    if last_request_id == state.last_report_request_id {
        return Ok(None);
    }

    let segment_start = get_request(env, state.last_report_request_id)?;
    let segment_end = get_request(env, last_request_id)?;
    let segment_rate = calc_batch(env, &segment_start, &segment_end)?.share_rate;

    let mut recorded = None;
    let mut trend = state.direction;

    if state.last_report_request_id != 0 {
        let step = direction(state.last_segment_rate, segment_rate);

        if step != RateDirection::Flat {
            if trend != RateDirection::Flat && trend != step {
                push_extremum(env, state.last_report_request_id);
                WithdrawalQueueEvents::extremum_recorded(env, state.last_report_request_id);
                recorded = Some(state.last_report_request_id);
            }
            trend = step;
        }
    }

    save_report_state(env, &ReportState {
        last_report_request_id: last_request_id,
        last_segment_rate: segment_rate,
        direction: trend,
    });

    Ok(recorded)
}

#[cfg(test)]
mod test {
    use test_case::test_case;

    use super::direction;
    use crate::storage::RateDirection;

    #[test_case(1, 2 => RateDirection::Rising ; "rising")]
    #[test_case(2, 1 => RateDirection::Falling ; "falling")]
    #[test_case(2, 2 => RateDirection::Flat ; "flat")]
    fn direction_of_a_step(prev_rate: i128, rate: i128) -> RateDirection {
        direction(prev_rate, rate)
    }
}
