/// Platform-agnostic sleep
#[cfg(target_arch = "wasm32")]
pub async fn platform_sleep(millis: u64) {
    use gloo_timers::future::TimeoutFuture;
    TimeoutFuture::new(millis.min(u32::MAX as u64) as u32).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn platform_sleep(millis: u64) {
    #[cfg(feature = "native")]
    {
        use instant::Duration;
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    #[cfg(not(feature = "native"))]
    compile_error!("Non-WASM builds require the 'native' feature to be enabled");
}
