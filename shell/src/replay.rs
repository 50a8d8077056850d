use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Instant,
};

use anyhow::{Context, Result};
use log::error;
use wand_input::{GestureLabel, GestureSampler, Vector3, WandEvent, dispatch};
use wand_scene::SceneObjects;

use crate::{Trace, TraceEventKind};

#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedGesture {
    /// Seconds since the start of the trace.
    pub time: f64,
    pub label: GestureLabel,
}

#[derive(Debug)]
pub struct ReplayReport {
    pub gestures: Vec<RecognizedGesture>,
    /// The scene after the last event.
    pub scene: SceneObjects,
}

/// Plays back all events of the trace, the way a host would drive the wand frame by frame.
pub fn replay(trace: &Trace) -> Result<ReplayReport> {
    let start = Instant::now();

    let position = Rc::new(Cell::new(Vector3::ZERO));
    let source = position.clone();
    let mut sampler = GestureSampler::new(move || source.get(), trace.wand.clone())?;

    let scene = Rc::new(RefCell::new(SceneObjects::from_config(&trace.scene)?));
    if !trace.scene.objects.is_empty() {
        let scene = scene.clone();
        sampler.subscribe(move |label| {
            if let Err(e) = scene.borrow_mut().on_gesture(label) {
                error!("{e:#}");
            }
        });
    }

    let mut gestures = Vec::new();
    for event in &trace.events {
        let now = start
            .checked_add(event.offset()?)
            .with_context(|| format!("Event at {}s is beyond the clock's range", event.time))?;
        if let Some(p) = event.position() {
            position.set(p);
        }

        let wand_event = match event.kind {
            TraceEventKind::HoldStart => WandEvent::HoldStarted(now),
            TraceEventKind::Tick => WandEvent::Tick(now),
            TraceEventKind::HoldEnd => WandEvent::HoldEnded(now),
        };
        if let Some(label) = dispatch(&mut sampler, wand_event) {
            gestures.push(RecognizedGesture {
                time: event.time,
                label,
            });
        }
        if event.kind == TraceEventKind::Tick {
            scene.borrow_mut().tick(now);
        }
    }

    // Releases the listener's reference to the scene.
    sampler.listeners_mut().clear();
    let scene = Rc::try_unwrap(scene)
        .map(RefCell::into_inner)
        .map_err(|_| anyhow::anyhow!("Scene is still shared after replay"))?;

    Ok(ReplayReport { gestures, scene })
}
