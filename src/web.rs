//! Browser backends. Currently the Web Audio positional-audio engine: one
//! `PannerNode` per scene wired into a shared `AudioContext`, spatialized
//! against the context listener.

use anyhow::{Result, anyhow};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, PannerNode};

use crate::{
    data_structures::transform::Transform,
    engine::{
        assets::AudioData,
        audio::{AudioEngine, SourceId, SpatialTuning},
    },
};

fn js_err(value: JsValue) -> anyhow::Error {
    anyhow!("{:?}", value)
}

struct WebSource {
    buffer: AudioBuffer,
    panner: PannerNode,
    looping: bool,
    /// The live one-shot node while playing. Web Audio source nodes are not
    /// restartable, so `play` mints a fresh node each time.
    playing: Option<AudioBufferSourceNode>,
}

pub struct WebAudioEngine {
    ctx: AudioContext,
    sources: Vec<WebSource>,
}

impl WebAudioEngine {
    pub fn new() -> Result<Self> {
        let ctx = AudioContext::new().map_err(js_err)?;
        Ok(Self {
            ctx,
            sources: Vec::new(),
        })
    }
}

impl AudioEngine for WebAudioEngine {
    async fn create_source(&mut self, data: AudioData, tuning: SpatialTuning) -> Result<SourceId> {
        let array = js_sys::Uint8Array::from(data.bytes.as_slice());
        let promise = self
            .ctx
            .decode_audio_data(&array.buffer())
            .map_err(js_err)?;
        let decoded = JsFuture::from(promise).await.map_err(js_err)?;
        let buffer: AudioBuffer = decoded
            .dyn_into()
            .map_err(|_| anyhow!("decodeAudioData returned a non-AudioBuffer"))?;

        let panner = PannerNode::new(&self.ctx).map_err(js_err)?;
        panner.set_ref_distance(tuning.ref_distance as f64);
        panner
            .connect_with_audio_node(&self.ctx.destination())
            .map_err(js_err)?;

        let id = SourceId(self.sources.len());
        self.sources.push(WebSource {
            buffer,
            panner,
            looping: tuning.looping,
            playing: None,
        });
        Ok(id)
    }

    fn play(&mut self, source: SourceId) {
        let Some(entry) = self.sources.get_mut(source.0) else {
            return;
        };
        if entry.playing.is_some() {
            return;
        }
        let node = match self.ctx.create_buffer_source() {
            Ok(node) => node,
            Err(e) => {
                log::error!("unable to create audio source node: {:?}", e);
                return;
            }
        };
        node.set_buffer(Some(&entry.buffer));
        node.set_loop(entry.looping);
        if let Err(e) = node.connect_with_audio_node(&entry.panner) {
            log::error!("unable to connect audio source node: {:?}", e);
            return;
        }
        if let Err(e) = node.start() {
            log::error!("unable to start audio source node: {:?}", e);
            return;
        }
        entry.playing = Some(node);
    }

    fn stop(&mut self, source: SourceId) {
        let Some(entry) = self.sources.get_mut(source.0) else {
            return;
        };
        if let Some(node) = entry.playing.take() {
            if let Err(e) = node.stop() {
                log::error!("unable to stop audio source node: {:?}", e);
            }
        }
    }

    fn set_source_pose(&mut self, source: SourceId, pose: &Transform) {
        if let Some(entry) = self.sources.get(source.0) {
            entry.panner.position_x().set_value(pose.position.x);
            entry.panner.position_y().set_value(pose.position.y);
            entry.panner.position_z().set_value(pose.position.z);
        }
    }

    fn set_listener_pose(&mut self, pose: &Transform) {
        let listener = self.ctx.listener();
        listener.position_x().set_value(pose.position.x);
        listener.position_y().set_value(pose.position.y);
        listener.position_z().set_value(pose.position.z);
    }
}
