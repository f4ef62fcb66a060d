//! 抖动延迟源
//!
//! 从截断正态分布中采样等待时长，模拟人为停顿，
//! 避免自动化操作之间出现固定且可被识别的节奏

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use rand_distr::{Distribution, Normal};
use tokio::time::sleep;

/// 抖动延迟源
///
/// 职责：
/// - 产生 [low, upp] 区间内、形如人为停顿的随机时长
/// - 通过拒绝采样截断（区间外重采样，不做夹取），保留区间内的分布形状
/// - 无持久状态，可任意重复调用
#[derive(Debug, Clone)]
pub struct JitterDelay {
    dist: Normal<f64>,
    low: f64,
    upp: f64,
}

impl JitterDelay {
    /// 创建新的延迟源（参数单位：秒）
    pub fn new(mean: f64, sd: f64, low: f64, upp: f64) -> Result<Self> {
        ensure!(low >= 0.0, "延迟下界不能为负: {}", low);
        ensure!(low <= upp, "延迟区间无效: [{}, {}]", low, upp);
        // 均值落在区间外太远时，拒绝采样几乎永远采不中；直接拒绝这种配置
        ensure!(
            mean >= low && mean <= upp,
            "延迟均值 {} 必须落在区间 [{}, {}] 内",
            mean,
            low,
            upp
        );

        let dist = Normal::new(mean, sd).context("正态分布参数无效")?;

        Ok(Self { dist, low, upp })
    }

    /// 采样一个落在 [low, upp] 区间内的时长
    pub fn sample(&self) -> Duration {
        let mut rng = rand::thread_rng();
        loop {
            let secs = self.dist.sample(&mut rng);
            if secs >= self.low && secs <= self.upp {
                return Duration::from_secs_f64(secs);
            }
        }
    }

    /// 采样并异步等待
    pub async fn pause(&self) {
        sleep(self.sample()).await;
    }
}
