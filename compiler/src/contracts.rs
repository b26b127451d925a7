//! Qualified names of the runtime contracts the generated code binds to.

pub const LOG_PREFIX: &str = "ARouter::Compiler ";
pub const RUNTIME_TAG: &str = "ARouter::";
pub const SEPARATOR: &str = "$$";
pub const WARNING_TIPS: &str = "DO NOT EDIT THIS FILE!!! IT WAS GENERATED BY AROUTER.";

pub const PACKAGE_OF_GENERATE_FILE: &str = "com.alibaba.android.arouter.routes";

pub const NAME_OF_ROOT: &str = "ARouter$$Root";
pub const NAME_OF_PROVIDER: &str = "ARouter$$Providers";
pub const NAME_OF_GROUP: &str = "ARouter$$Group$$";
pub const NAME_OF_INTERCEPTOR: &str = "ARouter$$Interceptors";
pub const NAME_OF_AUTOWIRED: &str = "$$ARouter$$Autowired";

pub const METHOD_LOAD_INTO: &str = "loadInto";
pub const METHOD_INJECT: &str = "inject";

// Route targets, in classification order.
pub const ACTIVITY: &str = "android.app.Activity";
pub const ACTIVITY_ANDROIDX: &str = "androidx.appcompat.app.AppCompatActivity";
pub const FRAGMENT: &str = "android.app.Fragment";
pub const FRAGMENT_ANDROIDX: &str = "androidx.fragment.app.Fragment";
pub const FRAGMENT_V4: &str = "android.support.v4.app.Fragment";
pub const SERVICE: &str = "android.app.Service";

pub const PARCELABLE: &str = "android.os.Parcelable";
pub const SERIALIZABLE: &str = "java.io.Serializable";

pub const IPROVIDER: &str = "com.alibaba.android.arouter.facade.template.IProvider";
pub const IPROVIDER_GROUP: &str = "com.alibaba.android.arouter.facade.template.IProviderGroup";
pub const IINTERCEPTOR: &str = "com.alibaba.android.arouter.facade.template.IInterceptor";
pub const IINTERCEPTOR_GROUP: &str =
    "com.alibaba.android.arouter.facade.template.IInterceptorGroup";
pub const IROUTE_ROOT: &str = "com.alibaba.android.arouter.facade.template.IRouteRoot";
pub const IROUTE_GROUP: &str = "com.alibaba.android.arouter.facade.template.IRouteGroup";
pub const ISYRINGE: &str = "com.alibaba.android.arouter.facade.template.ISyringe";
pub const JSON_SERVICE: &str = "com.alibaba.android.arouter.facade.service.SerializationService";
pub const TYPE_WRAPPER: &str = "com.alibaba.android.arouter.facade.model.TypeWrapper";
pub const ROUTE_META: &str = "com.alibaba.android.arouter.facade.model.RouteMeta";
pub const ROUTE_TYPE: &str = "com.alibaba.android.arouter.facade.enums.RouteType";
pub const AROUTER: &str = "com.alibaba.android.arouter.launcher.ARouter";
pub const ANDROID_LOG: &str = "android.util.Log";

// Option keys passed by the host build.
pub const KEY_MODULE_NAME: &str = "AROUTER_MODULE_NAME";
pub const KEY_GENERATE_DOC_NAME: &str = "AROUTER_GENERATE_DOC";
pub const VALUE_ENABLE: &str = "enable";

pub const NO_MODULE_NAME_TIPS: &str = "These no module name, at 'build.gradle', like :\n\
ksp {\n    arg(\"AROUTER_MODULE_NAME\", project.getName())\n}\n";
