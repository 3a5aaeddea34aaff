//! Built-in JDK declarations.
//!
//! Sources are scanned without a class path, so the handful of platform
//! types that matter for binding resolution (and the best-known deprecated
//! JDK APIs) are declared here as compact signature strings.

use super::common::{is_primitive_name, TypeName, TypeParam};
use super::symbols::{DeclKind, MethodSymbol, SymbolTable, TypeSymbol, UnitContext};
use crate::model::Modifiers;
use std::collections::HashMap;
use std::sync::Arc;

struct PlatformType {
    /// Modifiers and keyword followed by the qualified name, with optional
    /// type parameters: `public final class java.lang.String`
    header: &'static str,
    deprecated: bool,
    extends: Option<&'static str>,
    implements: &'static [&'static str],
    /// `(signature, deprecated)`; constructors are spelled `<init>`
    members: &'static [(&'static str, bool)],
}

const fn ok(signature: &'static str) -> (&'static str, bool) {
    (signature, false)
}

const fn old(signature: &'static str) -> (&'static str, bool) {
    (signature, true)
}

const OBJECT: &str = "java.lang.Object";

static PLATFORM: &[PlatformType] = &[
    PlatformType {
        header: "public class java.lang.Object",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[
            ok("public <init>()"),
            ok("public java.lang.String toString()"),
            ok("public boolean equals(java.lang.Object)"),
            ok("public native int hashCode()"),
            ok("public final native java.lang.Class getClass()"),
            ok("public final native void notify()"),
            ok("public final native void notifyAll()"),
            ok("public final void wait()"),
            ok("public final void wait(long)"),
            ok("protected native java.lang.Object clone()"),
            old("protected void finalize()"),
        ],
    },
    PlatformType {
        header: "public abstract interface java.lang.CharSequence",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[
            ok("public abstract int length()"),
            ok("public abstract char charAt(int)"),
        ],
    },
    PlatformType {
        header: "public abstract interface java.lang.Comparable<T>",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[ok("public abstract int compareTo(T)")],
    },
    PlatformType {
        header: "public abstract interface java.lang.Runnable",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[ok("public abstract void run()")],
    },
    PlatformType {
        header: "public abstract interface java.lang.Iterable<T>",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[ok("public abstract java.util.Iterator iterator()")],
    },
    PlatformType {
        header: "public abstract interface java.lang.AutoCloseable",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[ok("public abstract void close()")],
    },
    PlatformType {
        header: "public final class java.lang.String",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.lang.CharSequence", "java.lang.Comparable"],
        members: &[
            ok("public <init>()"),
            ok("public <init>(java.lang.String)"),
            ok("public <init>(char[])"),
            ok("public <init>(byte[])"),
            old("public <init>(byte[],int)"),
            old("public <init>(byte[],int,int,int)"),
            ok("public int length()"),
            ok("public boolean isEmpty()"),
            ok("public char charAt(int)"),
            ok("public java.lang.String substring(int)"),
            ok("public java.lang.String substring(int,int)"),
            ok("public java.lang.String trim()"),
            ok("public java.lang.String toUpperCase()"),
            ok("public java.lang.String toLowerCase()"),
            ok("public boolean contains(java.lang.CharSequence)"),
            ok("public boolean startsWith(java.lang.String)"),
            ok("public boolean endsWith(java.lang.String)"),
            ok("public int indexOf(java.lang.String)"),
            ok("public int compareTo(java.lang.String)"),
            ok("public java.lang.String[] split(java.lang.String)"),
            ok("public java.lang.String replace(java.lang.CharSequence,java.lang.CharSequence)"),
            ok("public byte[] getBytes()"),
            old("public void getBytes(int,int,byte[],int)"),
            ok("public static java.lang.String format(java.lang.String,java.lang.Object...)"),
            ok("public static java.lang.String valueOf(java.lang.Object)"),
            ok("public static java.lang.String valueOf(int)"),
            ok("public static java.lang.String join(java.lang.CharSequence,java.lang.CharSequence...)"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.StringBuilder",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.lang.CharSequence"],
        members: &[
            ok("public <init>()"),
            ok("public <init>(java.lang.String)"),
            ok("public java.lang.StringBuilder append(java.lang.String)"),
            ok("public java.lang.StringBuilder append(java.lang.Object)"),
            ok("public java.lang.StringBuilder append(int)"),
            ok("public java.lang.StringBuilder append(char)"),
            ok("public int length()"),
            ok("public char charAt(int)"),
            ok("public java.lang.String toString()"),
        ],
    },
    PlatformType {
        header: "public abstract class java.lang.Number",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            ok("public <init>()"),
            ok("public abstract int intValue()"),
            ok("public abstract long longValue()"),
            ok("public abstract double doubleValue()"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.Integer",
        deprecated: false,
        extends: Some("java.lang.Number"),
        implements: &["java.lang.Comparable"],
        members: &[
            old("public <init>(int)"),
            old("public <init>(java.lang.String)"),
            ok("public static java.lang.Integer valueOf(int)"),
            ok("public static java.lang.Integer valueOf(java.lang.String)"),
            ok("public static int parseInt(java.lang.String)"),
            ok("public int intValue()"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.Long",
        deprecated: false,
        extends: Some("java.lang.Number"),
        implements: &["java.lang.Comparable"],
        members: &[
            old("public <init>(long)"),
            old("public <init>(java.lang.String)"),
            ok("public static java.lang.Long valueOf(long)"),
            ok("public static long parseLong(java.lang.String)"),
            ok("public long longValue()"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.Short",
        deprecated: false,
        extends: Some("java.lang.Number"),
        implements: &["java.lang.Comparable"],
        members: &[
            old("public <init>(short)"),
            old("public <init>(java.lang.String)"),
            ok("public static java.lang.Short valueOf(short)"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.Byte",
        deprecated: false,
        extends: Some("java.lang.Number"),
        implements: &["java.lang.Comparable"],
        members: &[
            old("public <init>(byte)"),
            old("public <init>(java.lang.String)"),
            ok("public static java.lang.Byte valueOf(byte)"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.Double",
        deprecated: false,
        extends: Some("java.lang.Number"),
        implements: &["java.lang.Comparable"],
        members: &[
            old("public <init>(double)"),
            old("public <init>(java.lang.String)"),
            ok("public static java.lang.Double valueOf(double)"),
            ok("public static double parseDouble(java.lang.String)"),
            ok("public double doubleValue()"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.Float",
        deprecated: false,
        extends: Some("java.lang.Number"),
        implements: &["java.lang.Comparable"],
        members: &[
            old("public <init>(float)"),
            old("public <init>(double)"),
            old("public <init>(java.lang.String)"),
            ok("public static java.lang.Float valueOf(float)"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.Boolean",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.lang.Comparable"],
        members: &[
            old("public <init>(boolean)"),
            old("public <init>(java.lang.String)"),
            ok("public static java.lang.Boolean valueOf(boolean)"),
            ok("public static boolean parseBoolean(java.lang.String)"),
            ok("public boolean booleanValue()"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.Character",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.lang.Comparable"],
        members: &[
            old("public <init>(char)"),
            ok("public static java.lang.Character valueOf(char)"),
            ok("public static boolean isDigit(char)"),
            ok("public static boolean isLetter(char)"),
            old("public static boolean isSpace(char)"),
            old("public static boolean isJavaLetter(char)"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.Math",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            ok("public static int abs(int)"),
            ok("public static double abs(double)"),
            ok("public static int max(int,int)"),
            ok("public static long max(long,long)"),
            ok("public static double max(double,double)"),
            ok("public static int min(int,int)"),
            ok("public static long min(long,long)"),
            ok("public static double min(double,double)"),
            ok("public static double sqrt(double)"),
            ok("public static double random()"),
        ],
    },
    PlatformType {
        header: "public class java.lang.Thread",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.lang.Runnable"],
        members: &[
            ok("public <init>()"),
            ok("public <init>(java.lang.Runnable)"),
            ok("public <init>(java.lang.String)"),
            ok("public <init>(java.lang.Runnable,java.lang.String)"),
            ok("public void start()"),
            ok("public void run()"),
            ok("public void interrupt()"),
            ok("public final void join()"),
            ok("public final boolean isAlive()"),
            ok("public final java.lang.String getName()"),
            ok("public final void setDaemon(boolean)"),
            ok("public static void sleep(long)"),
            ok("public static native java.lang.Thread currentThread()"),
            old("public final void stop()"),
            old("public final void suspend()"),
            old("public final void resume()"),
            old("public int countStackFrames()"),
            old("public long getId()"),
        ],
    },
    PlatformType {
        header: "public abstract class java.lang.Process",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            ok("public abstract int waitFor()"),
            ok("public abstract void destroy()"),
        ],
    },
    PlatformType {
        header: "public class java.lang.Runtime",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            ok("public static java.lang.Runtime getRuntime()"),
            ok("public native long totalMemory()"),
            ok("public native long freeMemory()"),
            ok("public native void gc()"),
            old("public void runFinalization()"),
            old("public java.lang.Process exec(java.lang.String)"),
            ok("public java.lang.Process exec(java.lang.String[])"),
        ],
    },
    PlatformType {
        header: "public final class java.lang.System",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            ok("public static native long currentTimeMillis()"),
            ok("public static native long nanoTime()"),
            ok("public static java.lang.String getProperty(java.lang.String)"),
            ok("public static java.lang.String getenv(java.lang.String)"),
            ok("public static void exit(int)"),
            ok("public static void gc()"),
            ok("public static native void arraycopy(java.lang.Object,int,java.lang.Object,int,int)"),
            old("public static void runFinalization()"),
            old("public static java.lang.SecurityManager getSecurityManager()"),
            old("public static void setSecurityManager(java.lang.SecurityManager)"),
        ],
    },
    PlatformType {
        header: "public class java.lang.SecurityManager",
        deprecated: true,
        extends: Some(OBJECT),
        implements: &[],
        members: &[old("public <init>()"), ok("public void checkPermission(java.security.Permission)")],
    },
    PlatformType {
        header: "public final class java.lang.Class<T>",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            ok("public java.lang.String getName()"),
            ok("public java.lang.String getSimpleName()"),
            ok("public static java.lang.Class forName(java.lang.String)"),
            old("public T newInstance()"),
        ],
    },
    PlatformType {
        header: "public abstract class java.lang.Enum<E>",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.lang.Comparable"],
        members: &[
            ok("public final java.lang.String name()"),
            ok("public final int ordinal()"),
        ],
    },
    PlatformType {
        header: "public abstract class java.lang.Record",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[],
    },
    PlatformType {
        header: "public class java.lang.Throwable",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            ok("public <init>()"),
            ok("public <init>(java.lang.String)"),
            ok("public <init>(java.lang.String,java.lang.Throwable)"),
            ok("public java.lang.String getMessage()"),
            ok("public void printStackTrace()"),
            ok("public synchronized java.lang.Throwable getCause()"),
        ],
    },
    PlatformType {
        header: "public class java.lang.Exception",
        deprecated: false,
        extends: Some("java.lang.Throwable"),
        implements: &[],
        members: &[
            ok("public <init>()"),
            ok("public <init>(java.lang.String)"),
            ok("public <init>(java.lang.String,java.lang.Throwable)"),
        ],
    },
    PlatformType {
        header: "public class java.lang.RuntimeException",
        deprecated: false,
        extends: Some("java.lang.Exception"),
        implements: &[],
        members: &[
            ok("public <init>()"),
            ok("public <init>(java.lang.String)"),
            ok("public <init>(java.lang.String,java.lang.Throwable)"),
        ],
    },
    PlatformType {
        header: "public class java.lang.IllegalArgumentException",
        deprecated: false,
        extends: Some("java.lang.RuntimeException"),
        implements: &[],
        members: &[ok("public <init>()"), ok("public <init>(java.lang.String)")],
    },
    PlatformType {
        header: "public class java.lang.IllegalStateException",
        deprecated: false,
        extends: Some("java.lang.RuntimeException"),
        implements: &[],
        members: &[ok("public <init>()"), ok("public <init>(java.lang.String)")],
    },
    PlatformType {
        header: "public class java.lang.Error",
        deprecated: false,
        extends: Some("java.lang.Throwable"),
        implements: &[],
        members: &[ok("public <init>()"), ok("public <init>(java.lang.String)")],
    },
    PlatformType {
        header: "public class java.lang.ThreadDeath",
        deprecated: true,
        extends: Some("java.lang.Error"),
        implements: &[],
        members: &[old("public <init>()")],
    },
    PlatformType {
        header: "public abstract @interface java.lang.Deprecated",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[],
    },
    PlatformType {
        header: "public abstract @interface java.lang.Override",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[],
    },
    PlatformType {
        header: "public abstract @interface java.lang.FunctionalInterface",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[],
    },
    PlatformType {
        header: "public abstract interface java.util.Iterator<E>",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[
            ok("public abstract boolean hasNext()"),
            ok("public abstract E next()"),
        ],
    },
    PlatformType {
        header: "public abstract interface java.util.Collection<E>",
        deprecated: false,
        extends: None,
        implements: &["java.lang.Iterable"],
        members: &[
            ok("public abstract int size()"),
            ok("public abstract boolean isEmpty()"),
            ok("public abstract boolean add(E)"),
            ok("public abstract boolean contains(java.lang.Object)"),
            ok("public abstract java.util.Iterator iterator()"),
        ],
    },
    PlatformType {
        header: "public abstract interface java.util.List<E>",
        deprecated: false,
        extends: None,
        implements: &["java.util.Collection"],
        members: &[
            ok("public abstract E get(int)"),
            ok("public abstract E set(int,E)"),
            ok("public abstract E remove(int)"),
        ],
    },
    PlatformType {
        header: "public class java.util.ArrayList<E>",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.util.List"],
        members: &[
            ok("public <init>()"),
            ok("public <init>(int)"),
            ok("public <init>(java.util.Collection)"),
        ],
    },
    PlatformType {
        header: "public abstract interface java.util.Map<K,V>",
        deprecated: false,
        extends: None,
        implements: &[],
        members: &[
            ok("public abstract V get(java.lang.Object)"),
            ok("public abstract V put(K,V)"),
            ok("public abstract boolean containsKey(java.lang.Object)"),
            ok("public abstract int size()"),
        ],
    },
    PlatformType {
        header: "public class java.util.HashMap<K,V>",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.util.Map"],
        members: &[ok("public <init>()"), ok("public <init>(int)")],
    },
    PlatformType {
        header: "public class java.util.Observable",
        deprecated: true,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            old("public <init>()"),
            old("public synchronized void addObserver(java.util.Observer)"),
            old("public void notifyObservers()"),
            old("public void notifyObservers(java.lang.Object)"),
            old("protected synchronized void setChanged()"),
        ],
    },
    PlatformType {
        header: "public abstract interface java.util.Observer",
        deprecated: true,
        extends: None,
        implements: &[],
        members: &[old("public abstract void update(java.util.Observable,java.lang.Object)")],
    },
    PlatformType {
        header: "public class java.util.Date",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.lang.Comparable"],
        members: &[
            ok("public <init>()"),
            ok("public <init>(long)"),
            old("public <init>(java.lang.String)"),
            old("public <init>(int,int,int)"),
            old("public <init>(int,int,int,int,int)"),
            old("public <init>(int,int,int,int,int,int)"),
            ok("public long getTime()"),
            ok("public boolean before(java.util.Date)"),
            ok("public boolean after(java.util.Date)"),
            old("public int getYear()"),
            old("public int getMonth()"),
            old("public int getDate()"),
            old("public int getDay()"),
            old("public int getHours()"),
            old("public int getMinutes()"),
            old("public int getSeconds()"),
            old("public void setYear(int)"),
            old("public void setMonth(int)"),
            old("public void setDate(int)"),
            old("public void setHours(int)"),
            old("public java.lang.String toLocaleString()"),
            old("public java.lang.String toGMTString()"),
            old("public static long parse(java.lang.String)"),
            old("public static long UTC(int,int,int,int,int,int)"),
        ],
    },
    PlatformType {
        header: "public abstract class java.io.InputStream",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.lang.AutoCloseable"],
        members: &[
            ok("public <init>()"),
            ok("public abstract int read()"),
            ok("public void close()"),
        ],
    },
    PlatformType {
        header: "public class java.io.DataInputStream",
        deprecated: false,
        extends: Some("java.io.InputStream"),
        implements: &[],
        members: &[
            ok("public <init>(java.io.InputStream)"),
            ok("public final int readInt()"),
            old("public final java.lang.String readLine()"),
        ],
    },
    PlatformType {
        header: "public class java.io.StringBufferInputStream",
        deprecated: true,
        extends: Some("java.io.InputStream"),
        implements: &[],
        members: &[old("public <init>(java.lang.String)")],
    },
    PlatformType {
        header: "public class java.io.File",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &["java.lang.Comparable"],
        members: &[
            ok("public <init>(java.lang.String)"),
            ok("public <init>(java.lang.String,java.lang.String)"),
            ok("public <init>(java.io.File,java.lang.String)"),
            ok("public boolean exists()"),
            ok("public java.lang.String getName()"),
            ok("public java.lang.String getPath()"),
            ok("public boolean delete()"),
            old("public java.net.URL toURL()"),
        ],
    },
    PlatformType {
        header: "public final class java.net.URL",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            old("public <init>(java.lang.String)"),
            old("public <init>(java.lang.String,java.lang.String,int,java.lang.String)"),
            ok("public java.lang.String getHost()"),
            ok("public java.io.InputStream openStream()"),
        ],
    },
    PlatformType {
        header: "public class java.net.URLEncoder",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            old("public static java.lang.String encode(java.lang.String)"),
            ok("public static java.lang.String encode(java.lang.String,java.lang.String)"),
        ],
    },
    PlatformType {
        header: "public class java.net.URLDecoder",
        deprecated: false,
        extends: Some(OBJECT),
        implements: &[],
        members: &[
            old("public static java.lang.String decode(java.lang.String)"),
            ok("public static java.lang.String decode(java.lang.String,java.lang.String)"),
        ],
    },
];

/// Add every platform type not already declared in source
pub fn install(table: &mut SymbolTable) {
    let mut contexts: HashMap<&str, Arc<UnitContext>> = HashMap::new();
    for platform in PLATFORM {
        let symbol = platform_symbol(platform, &mut contexts);
        table.insert(symbol, None);
    }
}

fn platform_symbol<'a>(
    platform: &'a PlatformType,
    contexts: &mut HashMap<&'a str, Arc<UnitContext>>,
) -> TypeSymbol {
    let (head, type_params) = match platform.header.split_once('<') {
        Some((head, params)) => (
            head,
            params
                .trim_end_matches('>')
                .split(',')
                .map(|p| TypeParam::unbounded(p.trim()))
                .collect(),
        ),
        None => (platform.header, Vec::new()),
    };

    let mut words: Vec<&str> = head.split_whitespace().collect();
    let qualified = words.pop().unwrap_or_default();
    let keyword = words.pop().unwrap_or("class");
    let modifiers: Modifiers = words.into_iter().collect();
    let decl = match keyword {
        "interface" => DeclKind::Interface,
        "@interface" => DeclKind::Annotation,
        "enum" => DeclKind::Enum,
        _ => DeclKind::Class,
    };

    let (package, simple) = qualified.rsplit_once('.').unwrap_or(("", qualified));
    let context = contexts
        .entry(package)
        .or_insert_with(|| {
            Arc::new(UnitContext {
                package: package.to_string(),
                imports: Vec::new(),
            })
        })
        .clone();

    let methods = platform
        .members
        .iter()
        .filter_map(|(signature, deprecated)| parse_member(signature, simple, *deprecated))
        .collect();

    TypeSymbol {
        binary_name: qualified.to_string(),
        qualified_name: qualified.to_string(),
        simple_name: simple.to_string(),
        decl,
        modifiers,
        deprecated: platform.deprecated,
        outer: None,
        local: false,
        type_params,
        superclass: platform.extends.map(TypeName::named),
        interfaces: platform.implements.iter().map(|i| TypeName::named(i)).collect(),
        members: Vec::new(),
        fields: Vec::new(),
        methods,
        context,
        site: None,
        supertypes: Vec::new(),
    }
}

/// Parse `public static java.lang.String valueOf(int)` or `public <init>(int)`
fn parse_member(signature: &str, owner: &str, deprecated: bool) -> Option<MethodSymbol> {
    let (head, params) = signature.split_once('(')?;
    let params = params.trim_end_matches(')');

    let mut words: Vec<&str> = head.split_whitespace().collect();
    let name = words.pop()?;
    let constructor = name == "<init>";
    let return_type = if constructor {
        None
    } else {
        Some(TypeName::parse(words.pop()?))
    };
    let modifiers: Modifiers = words.into_iter().collect();

    let params: Vec<&str> = params
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    let varargs = params.last().map(|p| p.ends_with("...")).unwrap_or(false);

    Some(MethodSymbol {
        name: if constructor { owner.to_string() } else { name.to_string() },
        params: params.into_iter().map(TypeName::parse).collect(),
        return_type,
        modifiers,
        deprecated,
        constructor,
        varargs,
        type_params: Vec::new(),
        site: None,
    })
}

/// Boxed counterpart of a primitive type name
pub fn boxed(primitive: &str) -> Option<&'static str> {
    Some(match primitive {
        "boolean" => "java.lang.Boolean",
        "byte" => "java.lang.Byte",
        "char" => "java.lang.Character",
        "short" => "java.lang.Short",
        "int" => "java.lang.Integer",
        "long" => "java.lang.Long",
        "float" => "java.lang.Float",
        "double" => "java.lang.Double",
        _ => return None,
    })
}

/// Primitive counterpart of a boxed type name
pub fn unboxed(qualified: &str) -> Option<&'static str> {
    Some(match qualified {
        "java.lang.Boolean" => "boolean",
        "java.lang.Byte" => "byte",
        "java.lang.Character" => "char",
        "java.lang.Short" => "short",
        "java.lang.Integer" => "int",
        "java.lang.Long" => "long",
        "java.lang.Float" => "float",
        "java.lang.Double" => "double",
        _ => return None,
    })
}

/// Widening primitive conversion, identity included
pub fn widens_to(from: &str, to: &str) -> bool {
    if from == to {
        return is_primitive_name(from);
    }
    let targets: &[&str] = match from {
        "byte" => &["short", "int", "long", "float", "double"],
        "short" | "char" => &["int", "long", "float", "double"],
        "int" => &["long", "float", "double"],
        "long" => &["float", "double"],
        "float" => &["double"],
        _ => &[],
    };
    targets.contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member() {
        let method = parse_member("public static java.lang.String format(java.lang.String,java.lang.Object...)", "String", false).unwrap();
        assert_eq!(method.name, "format");
        assert!(method.varargs);
        assert_eq!(method.params[1].to_string(), "java.lang.Object[]");
        assert_eq!(method.modifiers.to_string(), "public static");

        let ctor = parse_member("public <init>(int)", "Integer", true).unwrap();
        assert!(ctor.constructor);
        assert_eq!(ctor.name, "Integer");
        assert!(ctor.return_type.is_none());
        assert!(ctor.deprecated);
    }

    #[test]
    fn test_install() {
        let mut table = SymbolTable::new();
        install(&mut table);
        let thread = table.get(table.by_qualified("java.lang.Thread").unwrap());
        assert!(thread.methods.iter().any(|m| m.name == "stop" && m.deprecated));

        let comparable = table.get(table.by_qualified("java.lang.Comparable").unwrap());
        assert_eq!(comparable.type_params, vec![TypeParam::unbounded("T")]);
        assert!(comparable.decl.is_interface());

        let observer = table.get(table.by_qualified("java.util.Observer").unwrap());
        assert!(observer.deprecated);
        assert_eq!(observer.modifiers.to_string(), "public abstract");
    }

    #[test]
    fn test_widening() {
        assert!(widens_to("int", "long"));
        assert!(widens_to("char", "int"));
        assert!(!widens_to("long", "int"));
        assert!(!widens_to("boolean", "int"));
        assert!(widens_to("double", "double"));
    }
}
