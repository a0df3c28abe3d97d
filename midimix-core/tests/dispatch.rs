mod common;

use common::*;
use midimix_core::mapping::all_leds_off;
use midimix_core::MappingSettings;
use midimix_types::{
    Bank, Button, ControlEvent, CrossModePolicy, InboundMessage, KnobRow, Led, Mode, OscArg,
    OscTarget, OutboundMessage, SurfaceUpdate,
};
use std::sync::atomic::AtomicBool;

#[test]
fn test_start_announces_and_clears_surface() {
    let mut dispatcher = make_dispatcher();
    dispatcher.start();

    let sent = &dispatcher.transport().sent;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].addr, "/set_surface/24/159/19/0/0/0/0/0");
    assert_eq!(sent[0].target, OscTarget::Mixer);

    let updates = &dispatcher.surface().updates;
    // 16 strip LEDs and 2 bank LEDs off, then the two bank LEDs for bank 0
    assert_eq!(updates.len(), 20);
    assert!(updates.iter().all(|u| matches!(u, SurfaceUpdate::Led { on: false, .. })));
    assert_eq!(last_led(&dispatcher, Led::BankLeft), Some(false));
}

#[test]
fn test_controls_flow_to_transport() {
    let mut dispatcher = started();
    press(
        &mut dispatcher,
        &[
            ControlEvent::Fader { strip: strip(0), value: 127 },
            ControlEvent::ButtonDown(Button::Mute(strip(1))),
        ],
    );
    assert_eq!(
        dispatcher.transport().sent,
        vec![
            OutboundMessage::mixer("/strip/fader", vec![OscArg::Int(1), OscArg::Float(1.0)]),
            OutboundMessage::mixer("/strip/mute", vec![OscArg::Int(2), OscArg::Int(1)]),
        ]
    );
    assert_eq!(last_led(&dispatcher, Led::Mute(strip(1))), Some(true));
}

#[test]
fn test_feedback_lights_visible_strip() {
    let mut dispatcher = started();
    receive(
        &mut dispatcher,
        vec![
            InboundMessage::new("/strip/recenable", vec![OscArg::Int(3), OscArg::Int(1)]),
            InboundMessage::new("/strip/fader", vec![OscArg::Int(3), OscArg::Float(1.0)]),
        ],
    );
    assert_eq!(last_led(&dispatcher, Led::Rec(strip(2))), Some(true));
    assert!(dispatcher
        .surface()
        .updates
        .contains(&SurfaceUpdate::Fader { strip: strip(2), value: 127 }));
}

#[test]
fn test_bank_walk_with_refresh() {
    let mut dispatcher = started();
    for _ in 0..3 {
        press(&mut dispatcher, &[ControlEvent::ButtonDown(Button::BankRight)]);
    }
    assert_eq!(dispatcher.engine().state().bank(), Bank::new(2));
    let refreshes = sent_addrs(&dispatcher)
        .iter()
        .filter(|a| *a == "/refresh")
        .count();
    assert_eq!(refreshes, 2);
    assert_eq!(last_led(&dispatcher, Led::BankRight), Some(true));
    assert_eq!(last_led(&dispatcher, Led::BankLeft), Some(false));
}

#[test]
fn test_eq_session_end_to_end() {
    let mut dispatcher = started();

    // SOLO held + MUTE 4 switches strip 4 to EQ
    press(
        &mut dispatcher,
        &[
            ControlEvent::ButtonDown(Button::SoloShift),
            ControlEvent::ButtonDown(Button::Solo(strip(3))),
            ControlEvent::ButtonUp(Button::SoloShift),
        ],
    );
    assert_eq!(dispatcher.engine().state().mode(strip(3)), Mode::Eq);
    assert!(dispatcher
        .transport()
        .sent
        .contains(&OutboundMessage::equalizer("/strip/plugin/list", vec![OscArg::Int(4)])));

    receive(&mut dispatcher, vec![plugin_list(4, &["a-Comp", MONO_EQ])]);
    assert!(dispatcher.transport().sent.contains(&OutboundMessage::equalizer(
        "/strip/plugin/descriptor",
        vec![OscArg::Int(4), OscArg::Int(2)]
    )));

    clear_logs(&mut dispatcher);
    press(&mut dispatcher, &[ControlEvent::Fader { strip: strip(3), value: 127 }]);
    assert_eq!(
        dispatcher.transport().sent,
        vec![OutboundMessage::equalizer(
            "/strip/plugin/parameter",
            vec![OscArg::Int(4), OscArg::Int(2), OscArg::Int(18), OscArg::Float(18.0)]
        )]
    );

    // Back to MIX restores the strip from the mixer cache
    receive(
        &mut dispatcher,
        vec![InboundMessage::new("/strip/mute", vec![OscArg::Int(4), OscArg::Int(1)])],
    );
    assert_eq!(last_led(&dispatcher, Led::Mute(strip(3))), None);
    press(&mut dispatcher, &[ControlEvent::ButtonDown(Button::Solo(strip(3)))]);
    assert_eq!(dispatcher.engine().state().mode(strip(3)), Mode::Mix);
    assert_eq!(last_led(&dispatcher, Led::Mute(strip(3))), Some(true));
}

#[test]
fn test_failed_discovery_reverts_to_mix() {
    let mut dispatcher = started();
    press(&mut dispatcher, &[ControlEvent::ButtonDown(Button::Solo(strip(0)))]);
    receive(&mut dispatcher, vec![plugin_list(1, &[])]);
    assert_eq!(dispatcher.engine().state().mode(strip(0)), Mode::Mix);
    assert_eq!(dispatcher.engine().state().eq.focus(), None);
}

#[test]
fn test_dual_purpose_policy_through_dispatcher() {
    let mut dispatcher = make_dispatcher_with(MappingSettings {
        cross_mode: CrossModePolicy::DualPurpose,
        ..MappingSettings::default()
    });
    dispatcher.start();
    press(&mut dispatcher, &[ControlEvent::ButtonDown(Button::Solo(strip(7)))]);
    receive(&mut dispatcher, vec![plugin_list(8, &[MONO_EQ])]);
    clear_logs(&mut dispatcher);

    press(&mut dispatcher, &[ControlEvent::ButtonDown(Button::Mute(strip(7)))]);
    assert_eq!(sent_addrs(&dispatcher), vec!["/strip/plugin/parameter", "/strip/mute"]);
}

#[test]
fn test_solo_knob_sweep_sends_two_messages() {
    let mut dispatcher = started();
    let sweep: Vec<_> = [30, 40, 60, 70, 45, 55]
        .into_iter()
        .map(|value| ControlEvent::Knob { strip: strip(2), row: KnobRow::Bottom, value })
        .collect();
    press(&mut dispatcher, &sweep);
    assert_eq!(sent_addrs(&dispatcher), vec!["/strip/solo", "/strip/solo"]);
}

#[test]
fn test_malformed_feedback_does_not_stop_processing() {
    let mut dispatcher = started();
    receive(
        &mut dispatcher,
        vec![
            InboundMessage::new("/strip/mute", vec![OscArg::Str("oops".into())]),
            InboundMessage::new("/strip/mute", vec![OscArg::Int(1), OscArg::Int(1)]),
        ],
    );
    assert_eq!(last_led(&dispatcher, Led::Mute(strip(0))), Some(true));
}

#[test]
fn test_send_failures_are_dropped() {
    let mut dispatcher = started();
    dispatcher.transport_mut().failing.push("/strip/fader".to_string());
    press(
        &mut dispatcher,
        &[
            ControlEvent::Fader { strip: strip(0), value: 10 },
            ControlEvent::ButtonDown(Button::Rec(strip(0))),
        ],
    );
    assert_eq!(sent_addrs(&dispatcher), vec!["/strip/recenable"]);
}

#[test]
fn test_surface_failures_are_dropped() {
    let mut dispatcher = started();
    dispatcher.surface_mut().broken = true;
    press(&mut dispatcher, &[ControlEvent::ButtonDown(Button::Mute(strip(0)))]);
    assert_eq!(sent_addrs(&dispatcher), vec!["/strip/mute"]);
}

#[test]
fn test_session_reload_clears_leds() {
    let mut dispatcher = started();
    receive(
        &mut dispatcher,
        vec![InboundMessage::new("/strip/mute", vec![OscArg::Int(2), OscArg::Int(1)])],
    );
    assert_eq!(last_led(&dispatcher, Led::Mute(strip(1))), Some(true));
    receive(
        &mut dispatcher,
        vec![InboundMessage::new("/master/name", vec![OscArg::Str(String::new())])],
    );
    assert_eq!(last_led(&dispatcher, Led::Mute(strip(1))), Some(false));
}

#[test]
fn test_run_exits_when_flag_cleared() {
    let mut dispatcher = make_dispatcher();
    let running = AtomicBool::new(false);
    dispatcher.run(&running);

    // Startup announcement then the shutdown blackout
    assert_eq!(sent_addrs(&dispatcher), vec!["/set_surface/24/159/19/0/0/0/0/0"]);
    let tail = &dispatcher.surface().updates[dispatcher.surface().updates.len() - 18..];
    assert_eq!(tail, &all_leds_off().surface[..]);
}

#[test]
fn test_pump_counts_events() {
    let mut dispatcher = started();
    dispatcher
        .surface_mut()
        .pending
        .push_back(ControlEvent::MasterFader { value: 64 });
    dispatcher
        .transport_mut()
        .inbound
        .push_back(InboundMessage::new("/master/name", vec![OscArg::Str("Master".into())]));
    assert_eq!(dispatcher.pump(), 2);
    assert_eq!(dispatcher.pump(), 0);
}
