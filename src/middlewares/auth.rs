use crate::entities::Role;
use crate::error::AppError;
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// 访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Roles(&'static [Role]),
}

/// 一条访问规则：方法集合（None 表示任意方法）+ 路径模式
///
/// 路径模式按段匹配，`{x}` 匹配任意单段，结尾的 `*` 匹配剩余所有段。
#[derive(Debug, Clone)]
struct Rule {
    methods: Option<&'static [&'static str]>,
    pattern: &'static str,
    access: Access,
}

const GET: &[&str] = &["GET"];
const POST: &[&str] = &["POST"];
const PUT: &[&str] = &["PUT"];
const DELETE: &[&str] = &["DELETE"];
const GET_PUT: &[&str] = &["GET", "PUT"];
const GET_POST: &[&str] = &["GET", "POST"];

const USER_OR_ADMIN: &[Role] = &[Role::User, Role::Admin];
const USER_ONLY: &[Role] = &[Role::User];
const ASTROLOGER_ONLY: &[Role] = &[Role::Astrologer];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// 集中式访问策略，首条命中的规则生效，未命中则要求登录
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<Rule>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        let rule = |methods, pattern, access| Rule {
            methods,
            pattern,
            access,
        };
        Self {
            rules: vec![
                // 文档
                rule(None, "/swagger-ui", Access::Public),
                rule(None, "/swagger-ui/*", Access::Public),
                rule(None, "/api-docs/*", Access::Public),
                // 账号
                rule(Some(POST), "/auth/signup", Access::Public),
                rule(Some(POST), "/auth/login", Access::Public),
                rule(Some(POST), "/auth/refresh", Access::Public),
                rule(Some(GET_PUT), "/auth/profile", Access::Roles(USER_OR_ADMIN)),
                // 占星师，具体路径必须排在 {id} 之前
                rule(
                    Some(GET_PUT),
                    "/astrologers/profile",
                    Access::Roles(ASTROLOGER_ONLY),
                ),
                rule(Some(GET), "/astrologers/admin/all", Access::Roles(ADMIN_ONLY)),
                rule(
                    Some(PUT),
                    "/astrologers/admin/approve/{id}",
                    Access::Roles(ADMIN_ONLY),
                ),
                rule(
                    Some(PUT),
                    "/astrologers/admin/block/{id}",
                    Access::Roles(ADMIN_ONLY),
                ),
                rule(
                    Some(POST),
                    "/astrologers/{id}/reviews",
                    Access::Roles(USER_ONLY),
                ),
                rule(Some(GET), "/astrologers", Access::Public),
                rule(Some(GET), "/astrologers/{id}", Access::Public),
                // 咨询
                rule(Some(POST), "/consultation/start", Access::Roles(USER_ONLY)),
                rule(Some(POST), "/consultation/end", Access::Roles(USER_ONLY)),
                rule(Some(GET), "/consultation/history", Access::Roles(USER_ONLY)),
                // 钱包
                rule(Some(GET), "/wallet/admin/all", Access::Roles(ADMIN_ONLY)),
                rule(Some(GET), "/wallet", Access::Authenticated),
                // 支付
                rule(Some(GET), "/payment/pricing", Access::Public),
                rule(Some(POST), "/payment/*", Access::Authenticated),
                // 商城
                rule(Some(GET), "/shop/products", Access::Public),
                rule(Some(GET), "/shop/products/{id}", Access::Public),
                rule(Some(POST), "/shop/products", Access::Roles(ADMIN_ONLY)),
                rule(Some(PUT), "/shop/products/{id}", Access::Roles(ADMIN_ONLY)),
                rule(Some(DELETE), "/shop/products/{id}", Access::Roles(ADMIN_ONLY)),
                rule(Some(GET), "/shop/stats", Access::Roles(ADMIN_ONLY)),
                rule(Some(GET_POST), "/shop/orders", Access::Roles(USER_OR_ADMIN)),
                // 内容生成
                rule(None, "/api/horoscope/*", Access::Public),
                rule(None, "/api/kundali/*", Access::Public),
                // 上传
                rule(Some(POST), "/upload/*", Access::Authenticated),
            ],
        }
    }

    pub fn resolve(&self, method: &str, path: &str) -> Access {
        self.rules
            .iter()
            .find(|r| {
                r.methods.is_none_or(|ms| ms.contains(&method)) && path_matches(r.pattern, path)
            })
            .map(|r| r.access)
            .unwrap_or(Access::Authenticated)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new()
    }
}

fn path_matches(pattern: &str, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    let mut pattern_segs = pattern.trim_end_matches('/').split('/');
    let mut path_segs = path.split('/');

    loop {
        match (pattern_segs.next(), path_segs.next()) {
            (Some("*"), Some(seg)) => return !seg.is_empty(),
            (Some(p), Some(s)) => {
                let is_param = p.starts_with('{') && p.ends_with('}');
                if is_param {
                    if s.is_empty() {
                        return false;
                    }
                } else if p != s {
                    return false;
                }
            }
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// 已认证账号，由中间件写入请求扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthUser>().copied();
        ready(user.ok_or_else(|| AppError::AuthError("Missing access token".to_string()).into()))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
    policy: AccessPolicy,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self {
            jwt_service,
            policy: AccessPolicy::new(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            policy: self.policy.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    policy: AccessPolicy,
}

impl<S> AuthMiddlewareService<S> {
    fn bearer_user(&self, req: &ServiceRequest) -> Result<Option<AuthUser>, AppError> {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Ok(None);
        };

        let claims = self
            .jwt_service
            .verify_access_token(token)
            .map_err(|_| AppError::AuthError("Invalid access token".to_string()))?;
        Ok(Some(AuthUser {
            id: claims.account_id()?,
            role: claims.role,
        }))
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let access = self.policy.resolve(req.method().as_str(), req.path());

        if access == Access::Public {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let user = match self.bearer_user(&req) {
            Ok(Some(user)) => user,
            Ok(None) => {
                let error = AppError::AuthError("Missing access token".to_string());
                return Box::pin(async move { Err(error.into()) });
            }
            Err(error) => return Box::pin(async move { Err(error.into()) }),
        };

        if let Access::Roles(allowed) = access {
            if !allowed.contains(&user.role) {
                log::warn!(
                    "Role {} denied for {} {}",
                    user.role,
                    req.method(),
                    req.path()
                );
                return Box::pin(async move { Err(AppError::Forbidden.into()) });
            }
        }

        req.extensions_mut().insert(user);
        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matching() {
        assert!(path_matches("/astrologers/{id}", "/astrologers/12"));
        assert!(!path_matches("/astrologers/{id}", "/astrologers"));
        assert!(!path_matches("/astrologers/{id}", "/astrologers/12/reviews"));
        assert!(path_matches("/api/kundali/*", "/api/kundali/milan"));
        assert!(!path_matches("/api/kundali/*", "/api/kundali"));
        assert!(path_matches("/wallet", "/wallet/"));
    }

    #[test]
    fn test_specific_routes_win_over_params() {
        let policy = AccessPolicy::new();
        assert_eq!(
            policy.resolve("GET", "/astrologers/profile"),
            Access::Roles(ASTROLOGER_ONLY)
        );
        assert_eq!(
            policy.resolve("GET", "/astrologers/admin/all"),
            Access::Roles(ADMIN_ONLY)
        );
        assert_eq!(policy.resolve("GET", "/astrologers/7"), Access::Public);
    }

    #[test]
    fn test_method_sensitive_rules() {
        let policy = AccessPolicy::new();
        assert_eq!(policy.resolve("GET", "/shop/products"), Access::Public);
        assert_eq!(
            policy.resolve("POST", "/shop/products"),
            Access::Roles(ADMIN_ONLY)
        );
        assert_eq!(
            policy.resolve("DELETE", "/shop/products/3"),
            Access::Roles(ADMIN_ONLY)
        );
        assert_eq!(policy.resolve("GET", "/payment/pricing"), Access::Public);
        assert_eq!(
            policy.resolve("POST", "/payment/razorpay/verify"),
            Access::Authenticated
        );
        assert_eq!(
            policy.resolve("POST", "/shop/orders"),
            Access::Roles(USER_OR_ADMIN)
        );
        assert_eq!(
            policy.resolve("GET", "/shop/orders"),
            Access::Roles(USER_OR_ADMIN)
        );
    }

    #[test]
    fn test_unknown_paths_require_login() {
        let policy = AccessPolicy::new();
        assert_eq!(policy.resolve("GET", "/something/else"), Access::Authenticated);
        assert_eq!(policy.resolve("POST", "/auth/signup"), Access::Public);
        assert_eq!(policy.resolve("GET", "/auth/signup"), Access::Authenticated);
    }
}
