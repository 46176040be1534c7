use abona_infra::AbonaContext;
use std::fmt::Debug;
use tracing::error;

/// A unit of application logic. Implementations hold their own input and
/// run against the shared context. The trait is `Send` so use cases can be
/// driven from spawned background tasks.
#[async_trait::async_trait]
pub trait UseCase: Debug + Send {
    type Response;
    type Error: Debug;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &AbonaContext) -> Result<Self::Response, Self::Error>;
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx), fields(usecase = U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &AbonaContext) -> Result<U::Response, U::Error>
where
    U: UseCase,
{
    let res = usecase.execute(ctx).await;

    if let Err(e) = &res {
        error!("Use case error: {:?}", e);
    }

    res
}
