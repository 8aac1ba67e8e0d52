// ── Discovery coordinator ──
//
// Owns one onboarding / control session for one lamp: which phase we are
// in, which origin is active, and the single discovery sequence allowed
// to run. Every state change is published on `watch` channels, both as
// the raw `Phase` and as a declarative `Screen`.

pub mod extract;
pub mod phase;
pub mod probe;
pub mod sequence;

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use seazen_api::{LampClient, LampResponse, TransportConfig};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use url::Url;

use crate::config::DiscoveryConfig;
use crate::error::CoreError;
use crate::model::{LampInfo, LampState, Origin, PowerCommand, StateUpdate};
use crate::screen::Screen;
use crate::store::{AddressBook, KeyValueStore, PersistedAddress};
use crate::trace::DiagnosticTrace;

pub use self::extract::{KNOWN_AP_ADDRESSES, pick_station_ip};
pub use self::phase::{LinkStatus, Phase, Stage};
pub use self::probe::ProbeResult;
pub use self::sequence::SequenceGuard;

use self::probe::probe_info;
use self::sequence::Sequencer;

// ── Session state ────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Session {
    phase: Phase,
    link: LinkStatus,
    /// Last control failure, shown on the control screen.
    notice: Option<String>,
    /// Generation of the background re-discovery, while one runs.
    rediscovery: Option<u64>,
}

/// The lamp control calls go to.
#[derive(Debug)]
struct ActiveLamp {
    origin: Origin,
    client: LampClient,
}

// ── Coordinator ──────────────────────────────────────────────────

/// Discovery and control handle for one lamp.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Discovery operations
/// return the phase they ended in; an operation overtaken by a newer one
/// returns [`CoreError::Superseded`] and leaves no trace on the state.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: DiscoveryConfig,
    /// Bound to the AP origin; rebased for every other origin.
    ap_client: LampClient,
    ap_origin: Origin,
    ap_host: Option<Ipv4Addr>,
    mdns_origin: Origin,
    wifi_settings_url: Url,
    addresses: AddressBook,
    trace: Arc<DiagnosticTrace>,
    sequencer: Sequencer,
    session: Mutex<Session>,
    phase: watch::Sender<Phase>,
    link: watch::Sender<LinkStatus>,
    screen: watch::Sender<Screen>,
    active: ArcSwapOption<ActiveLamp>,
    rediscovery: Mutex<Option<JoinHandle<()>>>,
}

impl Coordinator {
    /// Build a coordinator. No network traffic happens until an operation runs.
    pub fn new(config: DiscoveryConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timings.probe_timeout);
        let ap_client = LampClient::new(config.ap_origin.clone(), &transport)?;

        let ap_origin = Origin::ap(&config.ap_origin)?;
        let ap_host = match ap_origin.url().host() {
            Some(url::Host::Ipv4(ip)) => Some(ip),
            _ => None,
        };
        let mdns_origin = Origin::mdns(&config.mdns_host)?;
        let wifi_settings_url = config.wifi_settings_url().map_err(|e| CoreError::InvalidAddress {
            input: format!("{}: {e}", config.ap_origin),
        })?;
        let addresses = AddressBook::new(store, config.store_namespace.clone());
        let trace = Arc::new(DiagnosticTrace::new(config.trace_capacity));

        let session = Session {
            phase: Phase::Idle,
            link: LinkStatus::Online,
            notice: None,
            rediscovery: None,
        };
        let (phase, _) = watch::channel(Phase::Idle);
        let (link, _) = watch::channel(LinkStatus::Online);
        let (screen, _) = watch::channel(Screen::describe(
            &session.phase,
            session.link,
            None,
            &wifi_settings_url,
        ));

        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                config,
                ap_client,
                ap_origin,
                ap_host,
                mdns_origin,
                wifi_settings_url,
                addresses,
                trace,
                sequencer: Sequencer::new(),
                session: Mutex::new(session),
                phase,
                link,
                screen,
                active: ArcSwapOption::empty(),
                rediscovery: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.inner.config
    }

    pub fn trace(&self) -> &Arc<DiagnosticTrace> {
        &self.inner.trace
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.inner.phase.borrow().clone()
    }

    pub fn phases(&self) -> watch::Receiver<Phase> {
        self.inner.phase.subscribe()
    }

    pub fn link_status(&self) -> LinkStatus {
        *self.inner.link.borrow()
    }

    pub fn link_statuses(&self) -> watch::Receiver<LinkStatus> {
        self.inner.link.subscribe()
    }

    pub fn screen(&self) -> Screen {
        self.inner.screen.borrow().clone()
    }

    pub fn screens(&self) -> watch::Receiver<Screen> {
        self.inner.screen.subscribe()
    }

    /// The origin control calls currently go to.
    pub fn active_origin(&self) -> Option<Origin> {
        self.inner.active.load().as_ref().map(|lamp| lamp.origin.clone())
    }

    /// Whether a background re-discovery is in flight.
    pub fn is_rediscovering(&self) -> bool {
        matches!(self.link_status(), LinkStatus::Rediscovering { .. })
    }

    /// Wait until no background re-discovery is running and return the
    /// resulting link status.
    pub async fn rediscovery_settled(&self) -> LinkStatus {
        let mut rx = self.inner.link.subscribe();
        match rx
            .wait_for(|link| !matches!(link, LinkStatus::Rediscovering { .. }))
            .await
        {
            Ok(link) => *link,
            Err(_) => self.link_status(),
        }
    }

    // ── Persisted address ────────────────────────────────────────

    pub fn persisted_address(&self) -> Result<Option<PersistedAddress>, CoreError> {
        self.inner.addresses.load()
    }

    /// Drop the remembered address. The active session is left alone.
    pub fn forget_address(&self) -> Result<(), CoreError> {
        self.inner.addresses.forget()?;
        self.inner.trace.info("Forgot remembered lamp address");
        Ok(())
    }

    // ── Discovery operations ─────────────────────────────────────

    /// Begin a session: try the remembered origin, otherwise a quick AP probe.
    pub async fn start_session(&self) -> Result<Phase, CoreError> {
        let guard = self.begin().await;
        self.inner.trace.info("Session start");

        match self.remembered_origin() {
            Some(origin) => {
                self.commit(
                    &guard,
                    Phase::Verifying {
                        origin: origin.clone(),
                    },
                )
                .await?;
                let timeout = self.inner.config.timings.probe_timeout;
                let result = self.probe(&guard, &origin, timeout).await?;
                if result.is_success() {
                    self.inner
                        .trace
                        .info(format!("Remembered address {origin} answered"));
                    return self.resolve(&guard, origin).await;
                }
                self.inner
                    .trace
                    .warn(format!("Remembered address {origin} did not answer: {result}"));
            }
            None => debug!("no remembered lamp address"),
        }

        let timeout = self.inner.config.timings.quick_probe_timeout;
        self.ap_probe(&guard, timeout).await
    }

    /// Deliberate "check availability" probe of the AP.
    pub async fn check_availability(&self) -> Result<Phase, CoreError> {
        let guard = self.begin().await;
        let timeout = self.inner.config.timings.probe_timeout;
        self.ap_probe(&guard, timeout).await
    }

    /// The user reports the lamp has joined their network: poll mDNS.
    pub async fn confirm_connected(&self) -> Result<Phase, CoreError> {
        let guard = self.begin().await;
        self.inner.trace.info("User confirmed Wi-Fi hand-off");
        self.clear_active();
        self.mdns_stage(&guard).await
    }

    /// The user is back on the lamp's AP: poll it for the station IP.
    ///
    /// Exhausting the window ends the session in `Unreachable`.
    pub async fn fetch_ip_from_ap(&self) -> Result<Phase, CoreError> {
        let guard = self.begin().await;
        let timings = &self.inner.config.timings;
        let ap_host = self.inner.ap_host;
        self.inner
            .trace
            .info(format!("Fetching lamp IP from {}", self.inner.ap_origin));

        let found = self
            .poll_stage(
                &guard,
                Stage::ApFallback,
                std::slice::from_ref(&self.inner.ap_origin),
                timings.ap_fallback_window,
                |_, result| {
                    let ip = pick_station_ip(result.body()?, ap_host)?;
                    Origin::from_user_input(&ip.to_string()).ok()
                },
            )
            .await?;

        match found {
            Some(origin) => self.resolve(&guard, origin).await,
            None => {
                let stage = Stage::ApFallback.to_string();
                let reason = format!("The lamp did not report its address during {stage}");
                self.inner.trace.error(reason.clone());
                self.commit(&guard, Phase::Unreachable { reason }).await?;
                Err(CoreError::AddressNotFound { stage })
            }
        }
    }

    /// Probe an address the user typed. On failure the phase is restored
    /// and the error returned so the user can try again.
    pub async fn continue_by_ip(&self, input: &str) -> Result<Phase, CoreError> {
        let origin = Origin::from_user_input(input).inspect_err(|e| {
            self.inner.trace.warn(e.to_string());
        })?;
        let guard = self.begin().await;
        let previous = self.phase();
        self.inner
            .trace
            .info(format!("Checking user-entered address {origin}"));

        self.commit(
            &guard,
            Phase::Verifying {
                origin: origin.clone(),
            },
        )
        .await?;
        let timeout = self.inner.config.timings.probe_timeout;
        let result = self.probe(&guard, &origin, timeout).await?;
        if result.is_success() {
            return self.resolve(&guard, origin).await;
        }

        self.inner
            .trace
            .warn(format!("{origin} did not answer: {result}"));
        let restore = if previous.is_transient() {
            Phase::Idle
        } else {
            previous
        };
        self.commit(&guard, restore).await?;
        Err(result
            .into_error()
            .unwrap_or_else(|| CoreError::Internal("probe failed without an error".into())))
    }

    /// Start over at the Wi-Fi hand-off after the session ended unreachable.
    pub async fn retry_handoff(&self) -> Result<Phase, CoreError> {
        let guard = self.begin().await;
        self.inner.trace.info("Retrying Wi-Fi hand-off");
        self.clear_active();
        self.commit(&guard, Phase::AwaitWifiHandoff).await?;
        Ok(Phase::AwaitWifiHandoff)
    }

    /// Where the user enters Wi-Fi credentials. Nothing is fetched.
    pub fn wifi_settings_url(&self) -> Url {
        let url = self.inner.wifi_settings_url.clone();
        self.inner
            .trace
            .info(format!("Opening Wi-Fi settings at {url}"));
        url
    }

    /// Abandon whatever discovery is running without starting another.
    pub async fn cancel(&self) {
        self.inner.sequencer.cancel_current();
        let mut session = self.inner.session.lock().await;
        if session.phase.is_transient() {
            session.phase = Phase::Idle;
        }
        session.rediscovery = None;
        if matches!(session.link, LinkStatus::Rediscovering { .. }) {
            session.link = LinkStatus::Lost;
        }
        self.publish(&session);
        debug!("discovery cancelled");
    }

    /// Cancel everything for good. Later operations return `Superseded`.
    pub async fn shutdown(&self) {
        self.inner.sequencer.shutdown();
        if let Some(handle) = self.inner.rediscovery.lock().await.take() {
            handle.abort();
        }
        info!("coordinator shut down");
    }

    // ── Control operations ───────────────────────────────────────

    /// `GET /json/state`.
    pub async fn read_state(&self) -> Result<LampState, CoreError> {
        let lamp = self.active()?;
        let result = lamp.client.state().await;
        let resp = self.check_control(&lamp, "read state", result).await?;
        Ok(resp.parse()?)
    }

    /// `GET /json/info` on the active origin.
    pub async fn read_info(&self) -> Result<LampInfo, CoreError> {
        let lamp = self.active()?;
        let result = lamp.client.info(lamp.client.timeout()).await;
        let resp = self.check_control(&lamp, "read info", result).await?;
        Ok(resp.parse()?)
    }

    pub async fn set_power(&self, command: PowerCommand) -> Result<Option<LampState>, CoreError> {
        self.apply(StateUpdate::power(command)).await
    }

    pub async fn set_brightness(&self, bri: u8) -> Result<Option<LampState>, CoreError> {
        self.apply(StateUpdate::brightness(bri)).await
    }

    pub async fn select_preset(&self, id: i32) -> Result<Option<LampState>, CoreError> {
        self.apply(StateUpdate::preset(id)).await
    }

    /// `POST /json/state`. Returns the lamp's new state when it sent one.
    pub async fn apply(&self, update: StateUpdate) -> Result<Option<LampState>, CoreError> {
        let lamp = self.active()?;
        let result = lamp.client.set_state(&update.verbose()).await;
        let resp = self.check_control(&lamp, "update state", result).await?;
        Ok(resp.parse().ok())
    }

    // ── Stages ───────────────────────────────────────────────────

    async fn ap_probe(&self, guard: &SequenceGuard, timeout: Duration) -> Result<Phase, CoreError> {
        self.commit(guard, Phase::ApProbe).await?;
        let ap = &self.inner.ap_origin;
        let result = self.probe(guard, ap, timeout).await?;

        let next = if result.is_success() {
            self.inner
                .trace
                .info(format!("Lamp access point {ap} answered"));
            Phase::ApSetup
        } else {
            self.inner
                .trace
                .warn(format!("Lamp access point {ap} check failed: {result}"));
            Phase::AwaitWifiHandoff
        };
        self.commit(guard, next.clone()).await?;
        Ok(next)
    }

    async fn mdns_stage(&self, guard: &SequenceGuard) -> Result<Phase, CoreError> {
        let window = self.inner.config.timings.mdns_window;
        let found = self
            .poll_stage(
                guard,
                Stage::Mdns,
                std::slice::from_ref(&self.inner.mdns_origin),
                window,
                |origin, result| result.is_success().then(|| origin.clone()),
            )
            .await?;

        match found {
            Some(origin) => self.resolve(guard, origin).await,
            None => {
                self.commit(guard, Phase::MdnsNotFound).await?;
                Ok(Phase::MdnsNotFound)
            }
        }
    }

    /// Probe `targets` once per tick until `accept` yields an origin or
    /// `window` runs out. `Ok(None)` means the window was exhausted.
    async fn poll_stage<F>(
        &self,
        guard: &SequenceGuard,
        stage: Stage,
        targets: &[Origin],
        window: Duration,
        mut accept: F,
    ) -> Result<Option<Origin>, CoreError>
    where
        F: FnMut(&Origin, &ProbeResult) -> Option<Origin>,
    {
        let timings = &self.inner.config.timings;
        let deadline = Instant::now() + window;
        let mut ticker = tokio::time::interval(timings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempt = 0u32;

        self.inner.trace.info(format!(
            "{stage}: polling {} every {}ms for {}ms",
            join_origins(targets),
            timings.poll_interval.as_millis(),
            window.as_millis()
        ));

        loop {
            tokio::select! {
                biased;
                () = guard.cancelled() => return Err(CoreError::Superseded),
                _ = ticker.tick() => {}
            }
            if attempt > 0 && Instant::now() >= deadline {
                break;
            }

            attempt += 1;
            self.mark_attempt(guard, stage, attempt).await?;
            for target in targets {
                let result = self.probe(guard, target, timings.poll_probe_timeout).await?;
                if let Some(found) = accept(target, &result) {
                    self.inner
                        .trace
                        .info(format!("{stage}: {found} found on attempt {attempt}"));
                    return Ok(Some(found));
                }
                self.inner
                    .trace
                    .warn(format!("{stage} attempt {attempt} at {target}: {result}"));
            }
        }

        self.inner.trace.warn(format!(
            "{stage}: nothing found after {attempt} attempts in {}ms",
            window.as_millis()
        ));
        Ok(None)
    }

    /// Background search after a control call could not reach the lamp.
    /// The control screen stays up, marked offline.
    async fn rediscover(self, guard: SequenceGuard, lost: Origin) {
        let mut targets = vec![self.inner.mdns_origin.clone()];
        if lost != self.inner.mdns_origin {
            targets.push(lost);
        }

        let window = self.inner.config.timings.mdns_window;
        let outcome = self
            .poll_stage(&guard, Stage::Rediscovery, &targets, window, |origin, result| {
                result.is_success().then(|| origin.clone())
            })
            .await;

        let result = match outcome {
            Ok(Some(origin)) => self.resolve(&guard, origin).await.map(|_| ()),
            Ok(None) => self.lose(&guard).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {}
            Err(CoreError::Superseded) => debug!("re-discovery superseded"),
            Err(e) => self.inner.trace.error(format!("Re-discovery failed: {e}")),
        }
        self.end_rediscovery(guard.generation()).await;
    }

    /// Leave `Rediscovering` if search `generation` is still the one on
    /// record. A resolve or loss has already cleared the record.
    async fn end_rediscovery(&self, generation: u64) {
        let mut session = self.inner.session.lock().await;
        if session.rediscovery != Some(generation) {
            return;
        }
        session.rediscovery = None;
        if matches!(session.link, LinkStatus::Rediscovering { .. }) {
            session.link = LinkStatus::Lost;
        }
        self.publish(&session);
    }

    /// Start a foreground sequence. It supersedes any background
    /// re-discovery, so the link drops out of `Rediscovering`.
    async fn begin(&self) -> SequenceGuard {
        let mut session = self.inner.session.lock().await;
        let guard = self.inner.sequencer.begin();
        if session.rediscovery.take().is_some() {
            self.inner
                .trace
                .info("Background re-discovery stopped by a new request");
            if matches!(session.link, LinkStatus::Rediscovering { .. }) {
                session.link = LinkStatus::Lost;
            }
            self.publish(&session);
        }
        guard
    }

    // ── Probing ──────────────────────────────────────────────────

    fn client_for(&self, origin: &Origin) -> LampClient {
        self.inner.ap_client.rebased(origin.url().clone())
    }

    /// One probe, abandoned as soon as the sequence is superseded.
    async fn probe(
        &self,
        guard: &SequenceGuard,
        origin: &Origin,
        timeout: Duration,
    ) -> Result<ProbeResult, CoreError> {
        let client = self.client_for(origin);
        tokio::select! {
            biased;
            () = guard.cancelled() => Err(CoreError::Superseded),
            result = probe_info(&client, timeout) => Ok(result),
        }
    }

    fn remembered_origin(&self) -> Option<Origin> {
        let persisted = match self.inner.addresses.load() {
            Ok(persisted) => persisted?,
            Err(e) => {
                self.inner
                    .trace
                    .warn(format!("Could not read remembered address: {e}"));
                return None;
            }
        };
        match Origin::from_persisted(&persisted.origin, &self.inner.config.mdns_host) {
            Ok(origin) => Some(origin),
            Err(e) => {
                self.inner.trace.warn(format!("Ignoring remembered address: {e}"));
                None
            }
        }
    }

    // ── Control plumbing ─────────────────────────────────────────

    fn active(&self) -> Result<Arc<ActiveLamp>, CoreError> {
        self.inner.active.load_full().ok_or(CoreError::NoActiveOrigin)
    }

    fn clear_active(&self) {
        self.inner.active.store(None);
    }

    /// Classify a control response. Unreachable lamps start a background
    /// re-discovery; HTTP errors are only reported.
    async fn check_control(
        &self,
        lamp: &ActiveLamp,
        operation: &str,
        result: Result<LampResponse, seazen_api::Error>,
    ) -> Result<LampResponse, CoreError> {
        let err = match result {
            Ok(resp) if resp.ok => {
                self.control_succeeded(lamp).await;
                return Ok(resp);
            }
            Ok(resp) => CoreError::http(resp.status, &resp.text),
            Err(e) => CoreError::from(e),
        };

        let message = format!("{operation} at {} failed: {err}", lamp.origin);
        let rediscover = err.triggers_rediscovery();
        if rediscover {
            self.inner.trace.error(message);
        } else {
            self.inner.trace.warn(message);
        }

        let guard = {
            let mut session = self.inner.session.lock().await;
            session.notice = Some(err.to_string());
            let start =
                rediscover && session.phase.is_resolved() && session.rediscovery.is_none();
            let guard = start.then(|| {
                let guard = self.inner.sequencer.begin();
                session.link = LinkStatus::Rediscovering { attempt: 0 };
                session.rediscovery = Some(guard.generation());
                guard
            });
            self.publish(&session);
            guard
        };
        if let Some(guard) = guard {
            self.spawn_rediscovery(guard, lamp.origin.clone()).await;
        }
        Err(err)
    }

    async fn control_succeeded(&self, lamp: &ActiveLamp) {
        self.persist(&lamp.origin);

        let mut session = self.inner.session.lock().await;
        if session.link == LinkStatus::Online && session.notice.is_none() {
            return;
        }
        if let Some(generation) = session.rediscovery.take() {
            if self.inner.sequencer.cancel_if_current(generation) {
                self.inner
                    .trace
                    .info(format!("{} answered again, re-discovery stopped", lamp.origin));
            }
        }
        session.link = LinkStatus::Online;
        session.notice = None;
        self.publish(&session);
    }

    async fn spawn_rediscovery(&self, guard: SequenceGuard, lost: Origin) {
        self.inner
            .trace
            .warn(format!("Lost contact with {lost}, searching again"));
        let handle = tokio::spawn(self.clone().rediscover(guard, lost));
        if let Some(previous) = self.inner.rediscovery.lock().await.replace(handle) {
            previous.abort();
        }
    }

    // ── State commits ────────────────────────────────────────────

    /// Apply `phase` if `guard` is still the live sequence.
    async fn commit(&self, guard: &SequenceGuard, phase: Phase) -> Result<(), CoreError> {
        let mut session = self.inner.session.lock().await;
        if !self.inner.sequencer.is_current(guard) {
            return Err(CoreError::Superseded);
        }
        if session.phase != phase {
            info!(phase = phase.name(), "phase transition");
        }
        session.phase = phase;
        self.publish(&session);
        Ok(())
    }

    async fn mark_attempt(
        &self,
        guard: &SequenceGuard,
        stage: Stage,
        attempt: u32,
    ) -> Result<(), CoreError> {
        let mut session = self.inner.session.lock().await;
        if !self.inner.sequencer.is_current(guard) {
            return Err(CoreError::Superseded);
        }
        match stage {
            Stage::Mdns => session.phase = Phase::MdnsProbe { attempt },
            Stage::ApFallback => session.phase = Phase::ApFallbackPoll { attempt },
            Stage::Rediscovery => session.link = LinkStatus::Rediscovering { attempt },
        }
        self.publish(&session);
        Ok(())
    }

    /// Make `origin` active, remember it, and show the control screen.
    async fn resolve(&self, guard: &SequenceGuard, origin: Origin) -> Result<Phase, CoreError> {
        let mut session = self.inner.session.lock().await;
        if !self.inner.sequencer.is_current(guard) {
            return Err(CoreError::Superseded);
        }

        self.inner.active.store(Some(Arc::new(ActiveLamp {
            client: self.client_for(&origin),
            origin: origin.clone(),
        })));
        self.persist(&origin);
        self.inner
            .trace
            .info(format!("Resolved lamp at {origin} ({})", origin.provenance()));

        let phase = Phase::Resolved { origin };
        info!(phase = phase.name(), "phase transition");
        session.phase = phase.clone();
        session.link = LinkStatus::Online;
        session.notice = None;
        session.rediscovery = None;
        self.publish(&session);
        Ok(phase)
    }

    /// Re-discovery came up empty: drop the origin and offer the fallbacks.
    async fn lose(&self, guard: &SequenceGuard) -> Result<(), CoreError> {
        let mut session = self.inner.session.lock().await;
        if !self.inner.sequencer.is_current(guard) {
            return Err(CoreError::Superseded);
        }
        self.clear_active();
        self.inner
            .trace
            .error("Lamp not found again; choose how to reconnect");
        session.phase = Phase::MdnsNotFound;
        session.link = LinkStatus::Lost;
        session.rediscovery = None;
        self.publish(&session);
        Ok(())
    }

    fn persist(&self, origin: &Origin) {
        if let Err(e) = self.inner.addresses.save(origin, Utc::now()) {
            self.inner
                .trace
                .warn(format!("Could not remember {origin}: {e}"));
        }
    }

    fn publish(&self, session: &Session) {
        self.inner.phase.send_replace(session.phase.clone());
        self.inner.link.send_replace(session.link);
        self.inner.screen.send_replace(Screen::describe(
            &session.phase,
            session.link,
            session.notice.as_deref(),
            &self.inner.wifi_settings_url,
        ));
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("ap_origin", &self.inner.ap_origin)
            .field("mdns_origin", &self.inner.mdns_origin)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

fn join_origins(origins: &[Origin]) -> String {
    origins
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
