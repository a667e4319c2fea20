use auto_job_submit::config::Config;
use auto_job_submit::infrastructure::{DeviceProfile, SessionRegistry};
use auto_job_submit::logger;
use auto_job_submit::models::PlatformId;
use auto_job_submit::platforms;
use auto_job_submit::services::auth::{AuthController, CredentialStore};
use auto_job_submit::workflow::pagination::PaginationWalker;

#[tokio::test]
#[ignore] // 默认忽略，需要本机可启动 Chrome：cargo test -- --ignored
async fn test_open_and_close_session() {
    // 初始化日志
    logger::init();

    let mut registry = SessionRegistry::new();
    let session = registry
        .open(PlatformId::Liepin, DeviceProfile::Desktop, true)
        .await
        .expect("启动浏览器会话失败");
    assert_eq!(session.platform, PlatformId::Liepin);

    // 同一平台重复打开应当报错
    let second = registry
        .open(PlatformId::Liepin, DeviceProfile::Desktop, true)
        .await;
    assert!(second.is_err(), "重复打开应当失败");

    registry.close(PlatformId::Liepin).await;
    assert!(registry.get(PlatformId::Liepin).is_none());
}

#[tokio::test]
#[ignore]
async fn test_close_all_releases_everything() {
    logger::init();

    let mut registry = SessionRegistry::new();
    registry
        .open(PlatformId::Liepin, DeviceProfile::Desktop, true)
        .await
        .expect("启动猎聘会话失败");
    registry
        .open(PlatformId::Zhilian, DeviceProfile::Desktop, true)
        .await
        .expect("启动智联会话失败");
    assert_eq!(registry.len(), 2);

    registry.close_all().await;
    assert!(registry.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_liepin_login_with_saved_cookie() {
    logger::init();

    let config = Config::load();
    let mut registry = SessionRegistry::new();
    let session = registry
        .open(PlatformId::Liepin, DeviceProfile::Desktop, config.headless)
        .await
        .expect("启动浏览器会话失败");

    let profile = platforms::profile_for(PlatformId::Liepin);
    let store = CredentialStore::new(config.cookie_path(PlatformId::Liepin));
    let auth = AuthController::new(&config);

    let state = auth
        .login(&session.page, &profile, &store)
        .await
        .expect("登录流程执行失败");
    println!("登录结果: {}", state);

    registry.close(PlatformId::Liepin).await;
}

#[tokio::test]
#[ignore]
async fn test_walk_first_page() {
    logger::init();

    let config = Config::load();
    let mut registry = SessionRegistry::new();
    let session = registry
        .open(PlatformId::Zhilian, DeviceProfile::Desktop, config.headless)
        .await
        .expect("启动浏览器会话失败");

    let profile = platforms::profile_for(PlatformId::Zhilian);
    let mut walker = PaginationWalker::new("java", Some("538".to_string()), None, 1, 2);

    let ready = walker
        .next_page(&session.page, &profile)
        .await
        .expect("遍历执行失败");
    println!("第一页结果: {:?}, 终止原因: {:?}", ready, walker.end_reason());

    registry.close(PlatformId::Zhilian).await;
}
