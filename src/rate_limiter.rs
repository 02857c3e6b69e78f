//local shortcuts

//third-party shortcuts
use tokio::time::Instant;

//standard shortcuts
use std::sync::Mutex;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// Configuration for the session start limiter. Defaults to 10 starts per second.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RateLimitConfig
{
    /// Length of the tracking window. Defaults to 1 second.
    pub period: Duration,
    /// Max number of tokens granted in any tracking window. Defaults to 10 tokens.
    pub max_count: u32
}

impl RateLimitConfig
{
    /// Limit to `max_count` tokens per second.
    pub fn per_second(max_count: u32) -> RateLimitConfig
    {
        RateLimitConfig{ period: Duration::from_secs(1), max_count }
    }
}

impl Default for RateLimitConfig
{
    fn default() -> RateLimitConfig
    {
        RateLimitConfig{
            period    : Duration::from_secs(1u64),
            max_count : 10u32,
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Grants tokens at a steady pace shared by every caller.
/// - Tokens are spaced `period / max_count` apart, so no window of length `period` holds more than `max_count`
///   grants.
/// - Callers that arrive while the limiter is idle get a token immediately. There is no burst allowance.
#[derive(Debug)]
pub struct RateLimiter
{
    /// rate limit configuration
    config: RateLimitConfig,
    /// time between two grants
    spacing: Duration,
    /// earliest time the next token may be granted
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter
{
    /// Make a new rate limiter.
    pub fn new(config: RateLimitConfig) -> RateLimiter
    {
        let spacing = config.period / config.max_count.max(1u32);
        RateLimiter{
                config,
                spacing,
                next_slot: Mutex::new(None),
            }
    }

    /// Access the limiter's config.
    pub fn config(&self) -> RateLimitConfig
    {
        self.config
    }

    /// Reserve the next token and return the instant at which it becomes valid.
    pub fn reserve(&self) -> Instant
    {
        let now = Instant::now();
        let Ok(mut next_slot) = self.next_slot.lock()
        else
        {
            tracing::error!("the rate limiter experienced a critical internal error");
            return now;
        };

        let slot = match *next_slot
        {
            Some(next) if next > now => next,
            _ => now,
        };
        *next_slot = Some(slot + self.spacing);

        slot
    }

    /// Wait for a token.
    pub async fn take(&self)
    {
        let slot = self.reserve();
        if slot > Instant::now()
        {
            tracing::trace!("waiting for rate limiter token");
            tokio::time::sleep_until(slot).await;
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------
