//! Turning camera frames into moves.
//!
//! A [`ScanSession`] tracks whether the scanner should keep looking at frames
//! and makes sure one scan of an in-game code leads to exactly one
//! submission. The server answers a submission with a [`ScanResponse`], which
//! [`ScanResponse::effects`] turns into the ordered list of UI updates.

use std::time::Duration;

use crate::GameState;

pub const ACTION_CORRECT: &str = "Correct!";
pub const ACTION_DEAD: &str = "Dead!";
pub const ACTION_GRABBED_METAL: &str = "Grabbed Metal!";

/// Actions after which the player should read their (new) clue instead of
/// scanning on.
pub const CLUE_ACTIONS: [&str; 3] = [ACTION_CORRECT, ACTION_DEAD, ACTION_GRABBED_METAL];

pub const TOAST_DURATION: Duration = Duration::from_millis(2000);
pub const CLUE_TAB_DELAY: Duration = Duration::from_millis(500);

pub const MISSING_CLUE_MESSAGE: &str = "did not get any clue content as a result";

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The corners of a detected code in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quad {
    pub top_left_corner: Point,
    pub top_right_corner: Point,
    pub bottom_right_corner: Point,
    pub bottom_left_corner: Point,
}

impl Quad {
    /// The four edges, clockwise starting at the top.
    pub fn edges(&self) -> [(Point, Point); 4] {
        [
            (self.top_left_corner, self.top_right_corner),
            (self.top_right_corner, self.bottom_right_corner),
            (self.bottom_right_corner, self.bottom_left_corner),
            (self.bottom_left_corner, self.top_left_corner),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecodedCode {
    pub data: String,
    pub location: Quad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionAttempts {
    #[default]
    DontInvert,
    OnlyInvert,
    AttemptBoth,
    InvertFirst,
}

impl InversionAttempts {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DontInvert => "dontInvert",
            Self::OnlyInvert => "onlyInvert",
            Self::AttemptBoth => "attemptBoth",
            Self::InvertFirst => "invertFirst",
        }
    }
}

/// Finds a QR code in a single frame.
pub trait QrDecoder {
    /// `rgba` holds `width * height` pixels with four bytes each.
    fn decode(
        &self,
        rgba: &[u8],
        width: u32,
        height: u32,
        inversion: InversionAttempts,
    ) -> Option<DecodedCode>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Capturing,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The session is not capturing, the frame loop should end.
    Halted,
    NoCode,
    Foreign(String),
    /// The same foreign code as in the previous frame.
    StillForeign(String),
    /// Stop the camera and submit the payload.
    Submit(String),
}

#[derive(Debug, Clone)]
pub struct ScanSession {
    prefix: String,
    phase: ScanPhase,
    continue_ticking: bool,
    scanned: Option<String>,
    foreign: Option<String>,
}

impl ScanSession {
    pub fn new<S>(prefix: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            phase: ScanPhase::Idle,
            continue_ticking: false,
            scanned: None,
            foreign: None,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn is_ticking(&self) -> bool {
        self.continue_ticking
    }

    /// The last in-game code that was handed out for submission.
    pub fn scanned(&self) -> Option<&str> {
        self.scanned.as_deref()
    }

    /// Whether a submitted code still waits for its response. A stop while the
    /// response is in flight ends the wait, the response must not restart
    /// capturing then.
    pub fn awaits_response(&self) -> bool {
        self.phase == ScanPhase::Submitting
    }

    pub fn is_in_game(&self, payload: &str) -> bool {
        payload.starts_with(&self.prefix)
    }

    pub fn start(&mut self) {
        tracing::debug!(from = ?self.phase, "Start capturing");
        self.phase = ScanPhase::Capturing;
        self.continue_ticking = true;
        self.scanned = None;
        self.foreign = None;
    }

    pub fn stop(&mut self) {
        tracing::debug!(from = ?self.phase, "Stop capturing");
        self.phase = ScanPhase::Idle;
        self.continue_ticking = false;
    }

    pub fn on_frame(&mut self, code: Option<&DecodedCode>) -> FrameOutcome {
        if !self.continue_ticking || self.phase != ScanPhase::Capturing {
            return FrameOutcome::Halted;
        }

        let code = match code {
            Some(c) => c,
            None => {
                self.foreign = None;
                return FrameOutcome::NoCode;
            }
        };

        if !self.is_in_game(&code.data) {
            if self.foreign.as_deref() == Some(code.data.as_str()) {
                return FrameOutcome::StillForeign(code.data.clone());
            }
            self.foreign = Some(code.data.clone());
            return FrameOutcome::Foreign(code.data.clone());
        }
        self.foreign = None;

        self.phase = ScanPhase::Submitting;
        self.continue_ticking = false;
        self.scanned = Some(code.data.clone());
        FrameOutcome::Submit(code.data.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameArtifacts {
    #[serde(rename = "redirectUrl", default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// What the server answers to a scanned code.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScanResponse {
    #[serde(rename = "GameArtifacts", default, skip_serializing_if = "Option::is_none")]
    pub game_artifacts: Option<GameArtifacts>,
    #[serde(rename = "PortHTML", default, skip_serializing_if = "Option::is_none")]
    pub port_html: Option<String>,
    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<GameState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEffect {
    Navigate(String),
    ReplaceClue(String),
    ReportError(String),
    /// Shown for [`TOAST_DURATION`].
    Toast(String),
    ShowClueTab { after: Duration },
    ResumeScanning,
    RenderState(GameState),
}

pub fn is_clue_action(action: &str) -> bool {
    CLUE_ACTIONS.contains(&action)
}

impl ScanResponse {
    pub fn with_action<S>(action: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            game_artifacts: Some(GameArtifacts {
                redirect_url: None,
                action: Some(action.into()),
            }),
            ..Default::default()
        }
    }

    pub fn redirect<S>(url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            game_artifacts: Some(GameArtifacts {
                redirect_url: Some(url.into()),
                action: None,
            }),
            ..Default::default()
        }
    }

    pub fn action(&self) -> Option<&str> {
        self.game_artifacts.as_ref()?.action.as_deref()
    }

    pub fn redirect_url(&self) -> Option<&str> {
        self.game_artifacts.as_ref()?.redirect_url.as_deref()
    }

    pub fn effects(&self) -> Vec<ResponseEffect> {
        if let Some(url) = self.redirect_url() {
            return vec![ResponseEffect::Navigate(url.to_owned())];
        }

        let mut effects = Vec::with_capacity(4);

        match &self.port_html {
            Some(html) => effects.push(ResponseEffect::ReplaceClue(html.clone())),
            None => effects.push(ResponseEffect::ReportError(MISSING_CLUE_MESSAGE.to_owned())),
        }

        if let Some(action) = self.action() {
            effects.push(ResponseEffect::Toast(action.to_owned()));
            if is_clue_action(action) {
                effects.push(ResponseEffect::ShowClueTab {
                    after: CLUE_TAB_DELAY,
                });
            } else {
                effects.push(ResponseEffect::ResumeScanning);
            }
        }

        if let Some(state) = self.state {
            effects.push(ResponseEffect::RenderState(state));
        }

        effects
    }
}
