use super::errors::SemanticErrorKind;
use super::{Kind, VariableVerifier};
use crate::grammar::Matcher;
use std::collections::{HashMap, HashSet};

/// 一次声明的身份，同名的不同声明互不相同
/// 作用域按值复制后，靠它认出哪些条目是同一个变量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VarId(u32);

/// 一次分析内的声明编号，从 1 开始
#[derive(Debug, Clone, Default)]
pub struct VarIds {
    last: u32,
}

impl VarIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> VarId {
        self.last += 1;
        VarId(self.last)
    }
}

/// 一个变量：声明语句或方法参数产生
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub kind: Kind,
    /// 一旦变为 true 就不会再变回 false
    pub initialized: bool,
    pub is_final: bool,
    /// 加入作用域时才分配
    pub id: VarId,
}

impl Variable {
    pub fn new(name: impl Into<String>, kind: Kind, is_final: bool, initialized: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            initialized,
            is_final,
            id: VarId::default(),
        }
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }
}

/// 名字 -> 变量，同一个 Scope 内名字唯一
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    variables: HashMap<String, Variable>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// 方法参数组成的作用域，参数一律视为已初始化
    /// 每次进入方法体，参数都是新的变量
    pub fn from_parameters(params: &[Variable], ids: &mut VarIds) -> Self {
        let mut scope = Self::new();
        for param in params {
            let mut param = param.clone();
            param.id = ids.next();
            param.mark_initialized();
            scope.variables.insert(param.name.clone(), param);
        }
        scope
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.get_mut(name)
    }

    /// 加入新变量，同名则拒绝
    pub fn declare(&mut self, variable: Variable) -> Result<(), SemanticErrorKind> {
        if self.contains(&variable.name) {
            return Err(SemanticErrorKind::AlreadyDeclared(variable.name));
        }
        self.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// 把 self 叠在 parent 之上得到新的作用域
    /// 同名时 self 的条目胜出 (遮蔽)，两个输入都不被修改
    pub fn merged_over(&self, parent: &Scope) -> Scope {
        let mut merged = parent.clone();
        for (name, variable) in &self.variables {
            merged.variables.insert(name.clone(), variable.clone());
        }
        merged
    }

    /// 已初始化变量的身份
    pub fn initialized_ids(&self) -> impl Iterator<Item = VarId> + '_ {
        self.variables
            .values()
            .filter(|variable| variable.initialized)
            .map(|variable| variable.id)
    }

    /// 把别处记下的初始化同步回 self，只认身份不认名字
    pub fn absorb_initialized(&mut self, initialized: &HashSet<VarId>) {
        for variable in self.variables.values_mut() {
            if initialized.contains(&variable.id) {
                variable.mark_initialized();
            }
        }
    }
}

/// 一个未闭合的 `{`
#[derive(Debug, Clone)]
struct BlockFrame {
    /// 块头所在行
    opened_at: usize,
    /// 进入块时得到的 parent，块结束时恢复
    saved_parent: Scope,
}

/// 第二遍扫描的作用域状态机
/// parent / current 都是按值持有的 Scope，进出块时整体替换
#[derive(Debug, Clone)]
pub struct ScopeStack {
    parent: Scope,
    current: Scope,
    frames: Vec<BlockFrame>,
    /// 第一遍结束时冻结的全局作用域
    snapshot: Scope,
    ids: VarIds,
    /// 当前方法体里已初始化过的变量
    /// 合并时被遮蔽的条目会从 parent 里消失，初始化记录不能跟着丢
    initialized: HashSet<VarId>,
}

impl ScopeStack {
    /// ids 接着第一遍的编号继续分配
    pub fn new(globals: Scope, ids: VarIds) -> Self {
        Self {
            snapshot: globals.clone(),
            parent: globals,
            current: Scope::new(),
            frames: Vec::new(),
            ids,
            initialized: HashSet::new(),
        }
    }

    /// 嵌套深度，0 表示全局
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// 最内层未闭合块的起始行
    pub fn innermost_open_line(&self) -> Option<usize> {
        self.frames.last().map(|frame| frame.opened_at)
    }

    pub fn parent(&self) -> &Scope {
        &self.parent
    }

    pub fn current(&self) -> &Scope {
        &self.current
    }

    /// 进入新块：current 折叠进 parent 成为新的 parent，current 清空
    pub fn enter_block(&mut self, opened_at: usize) {
        self.record_initialized();

        let merged = self.current.merged_over(&self.parent);
        self.frames.push(BlockFrame {
            opened_at,
            saved_parent: merged.clone(),
        });
        self.parent = merged;
        self.current = Scope::new();
    }

    /// 离开当前块，返回新的深度
    /// 回到深度 0 时丢弃方法体对全局变量的一切修改
    pub fn exit_block(&mut self) -> Result<usize, SemanticErrorKind> {
        let frame = self
            .frames
            .pop()
            .ok_or(SemanticErrorKind::BracketImbalance)?;
        self.record_initialized();

        if self.frames.is_empty() {
            self.parent = self.snapshot.clone();
            self.initialized.clear();
        } else {
            let mut restored = frame.saved_parent;
            restored.absorb_initialized(&self.initialized);
            self.parent = restored;
        }
        self.current = Scope::new();

        Ok(self.depth())
    }

    fn record_initialized(&mut self) {
        self.initialized.extend(self.parent.initialized_ids());
        self.initialized.extend(self.current.initialized_ids());
    }

    /// 方法体的初始 current：全部参数
    pub fn seed_parameters(&mut self, params: &[Variable]) {
        self.current = Scope::from_parameters(params, &mut self.ids);
    }

    pub fn verifier<'s>(&'s mut self, matcher: &'s dyn Matcher) -> VariableVerifier<'s> {
        VariableVerifier::new(&mut self.parent, &mut self.current, &mut self.ids, matcher)
    }
}
