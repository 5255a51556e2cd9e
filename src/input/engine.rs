use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::config::GestureConfig;
use crate::types::Button;

use super::debounce::{DebounceEdge, Debouncer};
use super::types::{ButtonFrame, ButtonSnap, GestureEvent};

#[derive(Clone, Copy, Debug)]
enum GestureHsmEvent {
    Tick(ButtonFrame),
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    event: Option<GestureEvent>,
}

impl DispatchContext {
    fn emit(&mut self, event: GestureEvent) {
        // At most one event leaves the recognizer per tick.
        if self.event.is_none() {
            self.event = Some(event);
        }
    }
}

/// Two debounced buttons feeding a chord recognizer. `tick` takes the raw
/// pin levels as read this pass and returns at most one gesture.
pub struct InputEngine {
    mode_button: Debouncer,
    set_button: Debouncer,
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl InputEngine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            mode_button: Debouncer::new(config.debounce_ms),
            set_button: Debouncer::new(config.debounce_ms),
            machine: GestureHsm::new(config).state_machine(),
        }
    }

    pub fn tick(
        &mut self,
        now_ms: u32,
        mode_level_high: bool,
        set_level_high: bool,
    ) -> Option<GestureEvent> {
        let mode_edge = self.mode_button.update(now_ms, mode_level_high);
        let set_edge = self.set_button.update(now_ms, set_level_high);
        let frame = ButtonFrame {
            now_ms,
            mode: ButtonSnap {
                pressed: matches!(mode_edge, DebounceEdge::Pressed),
                held: self.mode_button.is_pressed(),
            },
            set: ButtonSnap {
                pressed: matches!(set_edge, DebounceEdge::Pressed),
                held: self.set_button.is_pressed(),
            },
        };
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureHsmEvent::Tick(frame), &mut context);
        context.event
    }
}

struct GestureHsm {
    config: GestureConfig,
    provisional: Button,
    phase_entered_ms: u32,
}

impl GestureHsm {
    fn new(config: GestureConfig) -> Self {
        Self {
            config,
            provisional: Button::Mode,
            phase_entered_ms: 0,
        }
    }

    fn phase_age_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.phase_entered_ms)
    }
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            GestureHsmEvent::Tick(frame) => {
                if frame.mode.pressed && frame.set.pressed {
                    self.phase_entered_ms = frame.now_ms;
                    return Transition(State::maybe_double_short());
                }
                if frame.mode.pressed || frame.set.pressed {
                    self.provisional = if frame.mode.pressed {
                        Button::Mode
                    } else {
                        Button::Set
                    };
                    self.phase_entered_ms = frame.now_ms;
                    return Transition(State::maybe_single());
                }
                Handled
            }
        }
    }

    #[state]
    fn maybe_single(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Tick(frame) => {
                let other_pressed = match self.provisional {
                    Button::Mode => frame.set.pressed,
                    Button::Set => frame.mode.pressed,
                };
                if other_pressed {
                    self.phase_entered_ms = frame.now_ms;
                    return Transition(State::maybe_double_short());
                }
                if self.phase_age_ms(frame.now_ms) >= self.config.single_press_ms {
                    context.emit(GestureEvent::Single(self.provisional));
                    return Transition(State::idle());
                }
                Handled
            }
        }
    }

    #[state]
    fn maybe_double_short(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Tick(frame) => {
                // The long window wins over a release observed on the same
                // tick: a release this late did not happen "before" it.
                if self.phase_age_ms(frame.now_ms) >= self.config.long_press_ms {
                    context.emit(GestureEvent::ResetLong);
                    return Transition(State::must_be_double_long());
                }
                if !frame.mode.held || !frame.set.held {
                    context.emit(GestureEvent::Reset);
                    return Transition(State::idle());
                }
                Handled
            }
        }
    }

    #[state]
    fn must_be_double_long(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        let _ = context;
        match event {
            GestureHsmEvent::Tick(frame) => {
                if !frame.mode.held && !frame.set.held {
                    return Transition(State::idle());
                }
                Handled
            }
        }
    }
}
