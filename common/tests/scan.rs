use common::scan::{
    DecodedCode, FrameOutcome, Point, Quad, ResponseEffect, ScanPhase, ScanResponse, ScanSession,
    CLUE_TAB_DELAY, MISSING_CLUE_MESSAGE,
};
use common::GameState;

use pretty_assertions::assert_eq;

const PREFIX: &str = "https://qr.sd3.in/";

fn code(data: &str) -> DecodedCode {
    let p = |x, y| Point { x, y };
    DecodedCode {
        data: data.to_owned(),
        location: Quad {
            top_left_corner: p(0.0, 0.0),
            top_right_corner: p(10.0, 0.0),
            bottom_right_corner: p(10.0, 10.0),
            bottom_left_corner: p(0.0, 10.0),
        },
    }
}

#[test]
fn idle_session_ignores_frames() {
    let mut session = ScanSession::new(PREFIX);

    assert_eq!(ScanPhase::Idle, session.phase());
    assert_eq!(FrameOutcome::Halted, session.on_frame(Some(&code("https://qr.sd3.in/xyz"))));
}

#[test]
fn classifies_codes() {
    let mut session = ScanSession::new(PREFIX);
    session.start();

    assert_eq!(FrameOutcome::NoCode, session.on_frame(None));
    assert_eq!(
        FrameOutcome::Foreign("https://example.com/menu".to_owned()),
        session.on_frame(Some(&code("https://example.com/menu")))
    );
    assert_eq!(ScanPhase::Capturing, session.phase());
    assert!(session.is_ticking());

    assert_eq!(
        FrameOutcome::Submit("https://qr.sd3.in/xyz".to_owned()),
        session.on_frame(Some(&code("https://qr.sd3.in/xyz")))
    );
    assert_eq!(ScanPhase::Submitting, session.phase());
    assert_eq!(Some("https://qr.sd3.in/xyz"), session.scanned());
}

#[test]
fn submits_once_per_scan() {
    let mut session = ScanSession::new(PREFIX);
    session.start();

    let frame = code("https://qr.sd3.in/#abcdefghij");
    let outcomes: Vec<_> = (0..3).map(|_| session.on_frame(Some(&frame))).collect();

    assert_eq!(
        vec![
            FrameOutcome::Submit(frame.data.clone()),
            FrameOutcome::Halted,
            FrameOutcome::Halted,
        ],
        outcomes
    );
    assert!(!session.is_ticking());
}

#[test]
fn resume_rearms_capture() {
    let mut session = ScanSession::new(PREFIX);
    session.start();
    session.on_frame(Some(&code("https://qr.sd3.in/a")));

    session.stop();
    assert_eq!(ScanPhase::Idle, session.phase());
    session.start();

    assert_eq!(None, session.scanned());
    assert_eq!(
        FrameOutcome::Submit("https://qr.sd3.in/b".to_owned()),
        session.on_frame(Some(&code("https://qr.sd3.in/b")))
    );
}

#[test]
fn quad_edges_close_the_shape() {
    let quad = code("x").location;
    let edges = quad.edges();

    for (i, (_, end)) in edges.iter().enumerate() {
        assert_eq!(*end, edges[(i + 1) % 4].0);
    }
}

#[test]
fn redirect_only_navigates() {
    let response: ScanResponse = serde_json::from_str(
        r#"{"GameArtifacts": {"redirectUrl": "/game"}, "PortHTML": "ignored", "State": {"life": 2}}"#,
    )
    .unwrap();

    assert_eq!(
        vec![ResponseEffect::Navigate("/game".to_owned())],
        response.effects()
    );
}

#[test]
fn correct_switches_to_clue() {
    let response: ScanResponse = serde_json::from_str(
        r#"{
            "GameArtifacts": {"action": "Correct!"},
            "PortHTML": "<p>next clue</p>",
            "State": {"user_level": 3, "life": 4, "has_al": true}
        }"#,
    )
    .unwrap();

    assert_eq!(
        vec![
            ResponseEffect::ReplaceClue("<p>next clue</p>".to_owned()),
            ResponseEffect::Toast("Correct!".to_owned()),
            ResponseEffect::ShowClueTab {
                after: CLUE_TAB_DELAY
            },
            ResponseEffect::RenderState(GameState {
                user_level: 3,
                life: 4,
                has_al: true,
                ..Default::default()
            }),
        ],
        response.effects()
    );
    assert_eq!(500, CLUE_TAB_DELAY.as_millis());
}

#[test]
fn dead_and_grab_also_switch() {
    for action in ["Dead!", "Grabbed Metal!"] {
        let response = ScanResponse::with_action(action);
        assert!(response.effects().contains(&ResponseEffect::ShowClueTab {
            after: CLUE_TAB_DELAY
        }));
    }
}

#[test]
fn other_actions_keep_scanning() {
    let mut response = ScanResponse::with_action("Lost a Life!");
    response.port_html = Some("same clue".to_owned());

    let effects = response.effects();
    assert!(effects.contains(&ResponseEffect::ResumeScanning));
    assert!(!effects
        .iter()
        .any(|e| matches!(e, ResponseEffect::ShowClueTab { .. })));
}

#[test]
fn missing_clue_is_reported() {
    let response: ScanResponse = serde_json::from_str(r#"{"State": {"life": 1}}"#).unwrap();

    assert_eq!(
        vec![
            ResponseEffect::ReportError(MISSING_CLUE_MESSAGE.to_owned()),
            ResponseEffect::RenderState(GameState {
                life: 1,
                ..Default::default()
            }),
        ],
        response.effects()
    );
}

#[test]
fn serialises_like_the_server_contract() {
    let mut response = ScanResponse::with_action("Correct!");
    response.port_html = Some("clue".to_owned());

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        serde_json::json!({
            "GameArtifacts": {"action": "Correct!"},
            "PortHTML": "clue",
        }),
        json
    );

    let json = serde_json::to_value(ScanResponse::redirect("/game")).unwrap();
    assert_eq!(serde_json::json!({"GameArtifacts": {"redirectUrl": "/game"}}), json);
}

#[test]
fn foreign_code_reported_once_while_in_view() {
    let mut session = ScanSession::new(PREFIX);
    session.start();

    let menu = code("https://example.com/menu");
    assert_eq!(FrameOutcome::Foreign(menu.data.clone()), session.on_frame(Some(&menu)));
    assert_eq!(FrameOutcome::StillForeign(menu.data.clone()), session.on_frame(Some(&menu)));
    assert_eq!(FrameOutcome::StillForeign(menu.data.clone()), session.on_frame(Some(&menu)));

    let other = code("https://example.com/other");
    assert_eq!(FrameOutcome::Foreign(other.data.clone()), session.on_frame(Some(&other)));

    // out of view and back again counts as new
    assert_eq!(FrameOutcome::NoCode, session.on_frame(None));
    assert_eq!(FrameOutcome::Foreign(other.data.clone()), session.on_frame(Some(&other)));
}

#[test]
fn response_resumes_only_a_waiting_session() {
    let mut session = ScanSession::new(PREFIX);
    assert!(!session.awaits_response());

    session.start();
    session.on_frame(Some(&code("https://qr.sd3.in/#abcdefghij")));
    assert!(session.awaits_response());

    // switched away from the scan tab before the answer came back
    session.stop();
    assert!(!session.awaits_response());

    session.start();
    assert!(!session.awaits_response());
}
